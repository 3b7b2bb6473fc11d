/// A `WeightGen` generates values for the initial state of a model's connection weights.
pub trait WeightGen {
    /// Should sample at most `n` weights.
    ///
    /// # Arguments
    /// * `n` - The upper limit of samples to generate.
    ///
    /// # Returns
    /// An option whether the generator is exhausted.
    fn sample(&mut self, n: usize) -> Option<Vec<f64>>;
}
