//! Feed-forward multi-class network trained by full-batch gradient descent.
//!
//! Architecture: input → 128 → 64 → classes, ReLU hidden activations,
//! softmax output, cross-entropy loss. Inputs are standardized per feature
//! (the raw MFCC means span wildly different scales across coefficients, and
//! the first coefficient dwarfs the rest).
//!
//! Training is deliberately full-batch and from-scratch: the enrolled
//! profile set is tiny (one vector per speaker), so a fresh fit converges in
//! well under the iteration cap and sidesteps the instability of adding
//! class labels incrementally.

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Per-feature standardization fitted on the training set and reapplied at
/// prediction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Normalizer {
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl Normalizer {
    fn fit(x: &Array2<f64>) -> Self {
        let mean = x.mean_axis(Axis(0)).expect("non-empty training set");
        let mut std = x.std_axis(Axis(0), 0.0);
        // Zero-variance features pass through unscaled.
        std.mapv_inplace(|s| if s < 1e-12 { 1.0 } else { s });
        Self { mean, std }
    }

    fn apply(&self, x: &Array2<f64>) -> Array2<f64> {
        (x - &self.mean) / &self.std
    }
}

// ---------------------------------------------------------------------------
// DenseLayer
// ---------------------------------------------------------------------------

/// One fully-connected layer: `output = input · weights + biases`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DenseLayer {
    weights: Array2<f64>,
    biases: Array1<f64>,
}

impl DenseLayer {
    /// Xavier-uniform initialisation.
    fn init(rng: &mut StdRng, fan_in: usize, fan_out: usize) -> Self {
        let limit = (6.0 / (fan_in + fan_out) as f64).sqrt();
        let weights =
            Array2::from_shape_fn((fan_in, fan_out), |_| rng.gen_range(-limit..limit));
        let biases = Array1::zeros(fan_out);
        Self { weights, biases }
    }

    fn forward(&self, input: &Array2<f64>) -> Array2<f64> {
        input.dot(&self.weights) + &self.biases
    }
}

// ---------------------------------------------------------------------------
// MlpModel
// ---------------------------------------------------------------------------

/// A trained multi-class network mapping feature vectors to class labels.
///
/// Serializable as a whole — weights, labels and normalizer — so a persisted
/// model predicts identically after a reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpModel {
    layers: Vec<DenseLayer>,
    labels: Vec<String>,
    normalizer: Normalizer,
}

impl MlpModel {
    /// Fit a fresh model on `samples`.
    ///
    /// Each sample is a `(label, vector)` pair; labels may repeat (last
    /// write wins upstream, but repeated labels simply contribute extra
    /// rows). The caller must guarantee at least two distinct labels and a
    /// consistent vector dimensionality.
    pub fn fit(samples: &[(String, Vec<f32>)], config: &ClassifierConfig) -> Self {
        let n = samples.len();
        let dim = samples[0].1.len();

        // Sorted distinct labels define the class index space.
        let mut labels: Vec<String> = samples.iter().map(|(l, _)| l.clone()).collect();
        labels.sort();
        labels.dedup();
        let num_classes = labels.len();
        debug_assert!(num_classes >= 2);

        let mut x = Array2::<f64>::zeros((n, dim));
        let mut y = vec![0usize; n];
        for (i, (label, vector)) in samples.iter().enumerate() {
            for (j, v) in vector.iter().enumerate() {
                x[[i, j]] = *v as f64;
            }
            y[i] = labels.binary_search(label).expect("label in class list");
        }

        let normalizer = Normalizer::fit(&x);
        let x = normalizer.apply(&x);

        // Layer sizes: dim → hidden… → num_classes.
        let mut sizes = vec![dim];
        sizes.extend_from_slice(&config.hidden_layers);
        sizes.push(num_classes);

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut layers: Vec<DenseLayer> = sizes
            .windows(2)
            .map(|w| DenseLayer::init(&mut rng, w[0], w[1]))
            .collect();

        // One-hot targets.
        let mut targets = Array2::<f64>::zeros((n, num_classes));
        for (i, &class) in y.iter().enumerate() {
            targets[[i, class]] = 1.0;
        }

        let mut velocity: Vec<(Array2<f64>, Array1<f64>)> = layers
            .iter()
            .map(|l| {
                (
                    Array2::zeros(l.weights.raw_dim()),
                    Array1::zeros(l.biases.raw_dim()),
                )
            })
            .collect();

        let mut prev_loss = f64::INFINITY;
        let mut iterations = 0;

        for iter in 0..config.max_iter {
            iterations = iter + 1;

            // ── Forward pass, keeping pre- and post-activation values ────
            let mut activations: Vec<Array2<f64>> = vec![x.clone()];
            let mut pre_activations: Vec<Array2<f64>> = Vec::with_capacity(layers.len());

            for (li, layer) in layers.iter().enumerate() {
                let z = layer.forward(activations.last().expect("input present"));
                let a = if li + 1 < layers.len() {
                    z.mapv(|v| v.max(0.0)) // ReLU on hidden layers
                } else {
                    softmax_rows(&z)
                };
                pre_activations.push(z);
                activations.push(a);
            }

            let probs = activations.last().expect("output present");
            let loss = cross_entropy(probs, &y);

            if (prev_loss - loss).abs() < config.tolerance {
                prev_loss = loss;
                break;
            }
            prev_loss = loss;

            // ── Backward pass ────────────────────────────────────────────
            // Softmax + cross-entropy: output delta is (p - onehot) / n.
            let mut delta = (probs - &targets) / n as f64;

            for li in (0..layers.len()).rev() {
                let grad_w = activations[li].t().dot(&delta);
                let grad_b = delta.sum_axis(Axis(0));

                if li > 0 {
                    let back = delta.dot(&layers[li].weights.t());
                    let mask = pre_activations[li - 1].mapv(|v| if v > 0.0 { 1.0 } else { 0.0 });
                    delta = back * mask;
                }

                let (vw, vb) = &mut velocity[li];
                *vw = &*vw * config.momentum - &(grad_w * config.learning_rate);
                *vb = &*vb * config.momentum - &(grad_b * config.learning_rate);
                layers[li].weights += &*vw;
                layers[li].biases += &*vb;
            }
        }

        log::debug!(
            "classifier fit: {n} samples, {num_classes} classes, \
             {iterations} iterations, loss {prev_loss:.6}"
        );

        Self {
            layers,
            labels,
            normalizer,
        }
    }

    /// Predict the class label of a single feature vector.
    ///
    /// Returns the best-matching label only — a point estimate with no
    /// calibrated confidence attached.
    pub fn predict(&self, vector: &[f32]) -> &str {
        let dim = vector.len();
        let mut x = Array2::<f64>::zeros((1, dim));
        for (j, v) in vector.iter().enumerate() {
            x[[0, j]] = *v as f64;
        }

        let mut a = self.normalizer.apply(&x);
        for (li, layer) in self.layers.iter().enumerate() {
            let z = layer.forward(&a);
            a = if li + 1 < self.layers.len() {
                z.mapv(|v| v.max(0.0))
            } else {
                z // argmax is invariant under softmax
            };
        }

        let best = a
            .row(0)
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).expect("finite logits"))
            .map(|(i, _)| i)
            .unwrap_or(0);

        &self.labels[best]
    }

    /// Input dimensionality the model was trained on.
    pub fn input_dim(&self) -> usize {
        self.layers[0].weights.nrows()
    }

    /// Number of distinct classes.
    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    /// Class labels, sorted ascending.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Row-wise softmax with the usual max-subtraction for stability.
fn softmax_rows(z: &Array2<f64>) -> Array2<f64> {
    let mut out = z.clone();
    for mut row in out.rows_mut() {
        let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }
    out
}

/// Mean negative log-likelihood of the true classes.
fn cross_entropy(probs: &Array2<f64>, y: &[usize]) -> f64 {
    let mut total = 0.0;
    for (i, &class) in y.iter().enumerate() {
        total -= probs[[i, class]].max(1e-12).ln();
    }
    total / y.len() as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
