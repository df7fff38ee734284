//! Random selection over a state's fun-fact list.

use rand::seq::SliceRandom;

/// Pick one fact uniformly at random, or `None` on an empty list.
///
/// Each call draws independently from the thread-local generator — no fixed
/// seed, no memoized pick.
pub fn pick_random(facts: &[String]) -> Option<&String> {
  facts.choose(&mut rand::thread_rng())
}
