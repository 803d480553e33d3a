pub mod snap;
pub mod spring;

pub use snap::{SnapAnimation, SnapStatus};
pub use spring::{DampedSpring, SpringConfig};
