use nalgebra::SVector;

/// Online mean and variance of N-component samples.
#[derive(Debug, Clone)]
pub struct Welford<const N: usize> {
    count: u32,
    mean: SVector<f64, N>,
    m2: SVector<f64, N>,
}

impl<const N: usize> Default for Welford<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Welford<N> {
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: SVector::zeros(),
            m2: SVector::zeros(),
        }
    }

    pub fn update(&mut self, x: &SVector<f64, N>) {
        self.count += 1;
        let n = self.count as f64;

        let delta = x - self.mean;
        self.mean += delta / n;
        let delta2 = x - self.mean;
        self.m2 += delta.component_mul(&delta2);
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn mean(&self) -> SVector<f64, N> {
        self.mean
    }

    /// population variance, None before the first sample
    pub fn variance(&self) -> Option<SVector<f64, N>> {
        if self.count > 0 {
            Some(self.m2 / self.count as f64)
        } else {
            None
        }
    }
}
