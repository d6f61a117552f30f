//! Stacks for the recursive passes
//!
//! The parser and the builder recurse once per nesting level and stop at `max_depth`. That
//! limit only turns deep input into an error if the stack can actually hold `max_depth`
//! levels, which the caller's thread (2 MiB for spawned and test threads) cannot in
//! unoptimized builds. Both passes therefore run on a scoped thread whose stack is sized from
//! the limit.

use std::panic;
use std::sync::{Mutex, PoisonError};
use std::thread;

/// Stack reserved per nesting level. One level is at most a handful of frames in either pass;
/// this leaves room for unoptimized builds.
pub const STACK_PER_LEVEL: usize = 64 * 1024;

/// Stack for everything around the recursion
const BASE_STACK: usize = 1024 * 1024;

/// Stack size for a pass limited to `max_depth` levels
pub fn stack_size(max_depth: usize) -> usize {
    max_depth
        .saturating_mul(STACK_PER_LEVEL)
        .saturating_add(BASE_STACK)
}

/// Run `task` on a thread with room for `max_depth` nesting levels and return its result.
///
/// Panics in `task` are resumed on the calling thread. If the thread cannot be created the
/// task runs on the current thread instead.
pub fn with_nesting_stack<T, F>(max_depth: usize, task: F) -> T
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    let slot = Mutex::new(Some(task));
    let take = || slot.lock().unwrap_or_else(PoisonError::into_inner).take();

    let outcome = thread::scope(|scope| {
        thread::Builder::new()
            .name("es3-nesting".to_string())
            .stack_size(stack_size(max_depth))
            .spawn_scoped(scope, || take().map(|task| task()))
            .map(|handle| handle.join())
    });

    match outcome {
        Ok(Ok(Some(value))) => return value,
        Ok(Err(payload)) => panic::resume_unwind(payload),
        Ok(Ok(None)) => {}
        Err(err) => log::warn!(
            target: "es3::nesting",
            "no {} byte stack available ({}), running on the current thread",
            stack_size(max_depth),
            err
        ),
    }

    match take() {
        Some(task) => task(),
        None => unreachable!("the nesting task runs exactly once"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_size_grows_with_depth() {
        assert_eq!(stack_size(0), BASE_STACK);
        assert_eq!(stack_size(10), BASE_STACK + 10 * STACK_PER_LEVEL);
        assert_eq!(stack_size(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_result_is_returned() {
        let input = vec![1, 2, 3];
        assert_eq!(with_nesting_stack(4, || input.iter().sum::<i32>()), 6);
    }

    #[test]
    fn test_runs_off_the_calling_thread() {
        let name = with_nesting_stack(4, || thread::current().name().map(str::to_string));
        assert_eq!(name.as_deref(), Some("es3-nesting"));
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_panics_propagate() {
        with_nesting_stack::<(), _>(4, || panic!("boom"));
    }

    #[test]
    fn test_deep_recursion_fits() {
        fn descend(level: usize) -> usize {
            let padding = std::hint::black_box([0u8; 4096]);
            if level == 0 {
                return usize::from(padding[0]);
            }
            1 + descend(level - 1)
        }
        // 512 frames of more than 4 KiB each do not fit a 2 MiB stack
        assert_eq!(with_nesting_stack(512, || descend(512)), 512);
    }
}
