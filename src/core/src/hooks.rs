/* src/core/src/hooks.rs */

//! Typed build hooks. Each chain folds a value through its registered
//! functions in registration order, so later hooks see earlier results.

use crate::errors::BuildError;

type HookFn<T> = Box<dyn Fn(T) -> Result<T, BuildError> + Send + Sync>;

pub struct HookChain<T> {
  hooks: Vec<HookFn<T>>,
}

impl<T> Default for HookChain<T> {
  fn default() -> Self {
    Self { hooks: Vec::new() }
  }
}

impl<T> HookChain<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push<F>(&mut self, hook: F)
  where
    F: Fn(T) -> Result<T, BuildError> + Send + Sync + 'static,
  {
    self.hooks.push(Box::new(hook));
  }

  pub fn is_empty(&self) -> bool {
    self.hooks.is_empty()
  }

  /// Fold `value` through every hook. The first error aborts the chain.
  pub fn run(&self, value: T) -> Result<T, BuildError> {
    self.hooks.iter().try_fold(value, |acc, hook| hook(acc))
  }
}
