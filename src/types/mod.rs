//! Plain data exchanged with callers.

pub mod geometry;
pub mod input;
pub mod output;

pub use geometry::{angle_between, Point2};
pub use input::{InputError, SkeletonInput};
pub use output::{ComponentReport, SimplifiedSkeleton, SkeletonPruning};
