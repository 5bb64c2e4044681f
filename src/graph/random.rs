use super::*;
use crate::errors::{Result, TspError};
use rand::Rng;
use rand_distr::{Distribution, Normal};

pub trait RandomInstance: Sized {
    /// Places `n` cities independently and uniformly at random in `[0, side)²`
    fn random_uniform<R: Rng>(rng: &mut R, n: NumNodes, side: f64) -> Result<Self>;

    /// Places `clusters` centers uniformly in `[0, side)²` and scatters `n` cities around
    /// uniformly chosen centers with a Gaussian of standard deviation `sigma`
    fn random_clustered<R: Rng>(
        rng: &mut R,
        n: NumNodes,
        clusters: NumNodes,
        side: f64,
        sigma: f64,
    ) -> Result<Self>;
}

impl RandomInstance for CompleteGraph {
    fn random_uniform<R: Rng>(rng: &mut R, n: NumNodes, side: f64) -> Result<Self> {
        let points: Vec<_> = (0..n)
            .map(|_| Point::new(rng.gen_range(0.0..side), rng.gen_range(0.0..side)))
            .collect();
        Self::try_from_points(points)
    }

    fn random_clustered<R: Rng>(
        rng: &mut R,
        n: NumNodes,
        clusters: NumNodes,
        side: f64,
        sigma: f64,
    ) -> Result<Self> {
        let clusters = clusters.max(1);
        let centers: Vec<_> = (0..clusters)
            .map(|_| Point::new(rng.gen_range(0.0..side), rng.gen_range(0.0..side)))
            .collect();

        let noise = Normal::new(0.0, sigma.max(f64::MIN_POSITIVE)).map_err(|e| {
            TspError::MalformedInput(format!("invalid cluster deviation {sigma}: {e}"))
        })?;

        let points: Vec<_> = (0..n)
            .map(|_| {
                let center = centers[rng.gen_range(0..centers.len())];
                Point::new(
                    center.x + noise.sample(rng),
                    center.y + noise.sample(rng),
                )
            })
            .collect();
        Self::try_from_points(points)
    }
}
