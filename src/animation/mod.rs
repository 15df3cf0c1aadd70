mod options;
mod spring;
mod timing;

pub use options::AnimationOptions;
pub use spring::SpringParams;
pub use timing::TimingFunction;
