use crate::error::Result;

/// One stage of the localization chain.
///
/// Stages borrow their inputs and are consumed by a single estimate.
pub trait Estimator<R>: Send + Sync
where
    R: Send + Sync,
{
    fn estimate(self) -> Result<R>;
}
