//! Oracles and populations shared by the engine tests.

use crate::classification::KNearestNeighbors;
use crate::dataset::Population;
use crate::error::Result;
use crate::primitives::Matrix;
use crate::traits::{Classifier, ClassifierFactory};

/// Oracle with scripted behavior for failure-path tests.
#[derive(Clone, Copy)]
pub(crate) enum Scripted {
    FailFit,
    Constant(usize),
    WrongCount,
}

impl Classifier for Scripted {
    fn fit(&mut self, _x: &Matrix<f32>, _y: &[usize]) -> Result<()> {
        match self {
            Scripted::FailFit => Err("singular training matrix".into()),
            _ => Ok(()),
        }
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        match *self {
            Scripted::Constant(label) => Ok(vec![label; x.n_rows()]),
            Scripted::WrongCount => Ok(vec![0; x.n_rows() + 1]),
            Scripted::FailFit => unreachable!("fit failed"),
        }
    }
}

impl ClassifierFactory for Scripted {
    fn name(&self) -> String {
        "scripted".to_string()
    }

    fn build(&self) -> Result<Box<dyn Classifier>> {
        Ok(Box::new(*self))
    }
}

pub(crate) struct NearestNeighbor;

impl ClassifierFactory for NearestNeighbor {
    fn name(&self) -> String {
        "kNN(k=1)".to_string()
    }

    fn build(&self) -> Result<Box<dyn Classifier>> {
        Ok(Box::new(KNearestNeighbors::new(1)))
    }
}

/// Users at 0, 10, 20, ... with tiny jitter; queries sit on their own user.
pub(crate) fn separated_population(n_users: usize) -> Population {
    let mut x_data = Vec::new();
    let mut y_data = Vec::new();
    for u in 0..n_users {
        let c = u as f32 * 10.0;
        x_data.push(Matrix::from_vec(3, 1, vec![c - 0.1, c, c + 0.1]).expect("3x1"));
        y_data.push(Matrix::from_vec(1, 1, vec![c + 0.05]).expect("1x1"));
    }
    Population::new(x_data, y_data).expect("population")
}
