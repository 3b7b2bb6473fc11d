use rand::{Rng, seq::SliceRandom};

use crate::{NetErr, Result};

/// A set of training samples stored as flat rows of `inputs ++ ideals`.
#[derive(Clone, Debug)]
pub struct Dataset {
    x_size: usize,
    y_size: usize,
    data: Vec<f64>,
    order: Vec<usize>,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `data` - The samples, one row of `x_size + y_size` values after the other.
    /// * `x_size` - The width of the inputs of each sample.
    /// * `y_size` - The width of the ideal outputs of each sample.
    ///
    /// # Errors
    /// `NetErr::ShapeMismatch` if `data` can't be split in whole rows.
    pub fn new(data: Vec<f64>, x_size: usize, y_size: usize) -> Result<Self> {
        let row = x_size + y_size;
        if row == 0 || data.len() % row != 0 {
            return Err(NetErr::ShapeMismatch {
                what: "dataset rows",
                got: data.len(),
                expected: data.len().next_multiple_of(row.max(1)),
            });
        }

        let order = (0..data.len() / row).collect();
        Ok(Self {
            x_size,
            y_size,
            data,
            order,
        })
    }

    /// Returns the amount of samples.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn x_size(&self) -> usize {
        self.x_size
    }

    pub fn y_size(&self) -> usize {
        self.y_size
    }

    /// Shuffles the order in which samples are visited.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.order.shuffle(rng);
    }

    /// Iterates the samples as `(inputs, ideals)` pairs, in the current order.
    pub fn samples(&self) -> impl Iterator<Item = (&[f64], &[f64])> {
        let row = self.x_size + self.y_size;

        self.order.iter().map(move |&i| {
            let sample = &self.data[i * row..(i + 1) * row];
            sample.split_at(self.x_size)
        })
    }
}
