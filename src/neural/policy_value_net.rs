use crate::chemistry::fingerprint::HashedFingerprint;
use crate::chemistry::molecule::Molecule;
use crate::neural::model_io::{load_tensors, DenseTensor};
use crate::neural::ranker::{top_candidates, RuleRanker, RuleRanking};
use crate::{Result, RetroError};
use std::collections::HashMap;
use std::path::Path;

/// Fully connected layer, weights stored `[out, in]` row-major.
#[derive(Debug, Clone)]
struct Linear {
    weight: Vec<f32>,
    bias: Vec<f32>,
    in_dim: usize,
    out_dim: usize,
}

impl Linear {
    fn from_tensors(weight: DenseTensor, bias: DenseTensor, name: &str) -> Result<Self> {
        let (out_dim, in_dim) = match weight.shape.as_slice() {
            [out_dim, in_dim] => (*out_dim, *in_dim),
            other => {
                return Err(RetroError::Artifact(format!(
                    "{name}.weight must be 2-D, got shape {other:?}"
                )))
            }
        };
        if bias.shape != [out_dim] {
            return Err(RetroError::Artifact(format!(
                "{name}.bias must have shape [{out_dim}], got {:?}",
                bias.shape
            )));
        }
        Ok(Self {
            weight: weight.data,
            bias: bias.data,
            in_dim,
            out_dim,
        })
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        (0..self.out_dim)
            .map(|row| {
                let weights = &self.weight[row * self.in_dim..(row + 1) * self.in_dim];
                weights
                    .iter()
                    .zip(input)
                    .fold(self.bias[row], |acc, (w, x)| acc + w * x)
            })
            .collect()
    }

    /// Forward pass for a binary input given by its set indices.
    fn forward_sparse(&self, active: &[usize]) -> Vec<f32> {
        (0..self.out_dim)
            .map(|row| {
                let offset = row * self.in_dim;
                active
                    .iter()
                    .fold(self.bias[row], |acc, &col| acc + self.weight[offset + col])
            })
            .collect()
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Policy/value network over hashed fingerprints.
///
/// One ReLU hidden layer feeds a sigmoid policy head with one output per rule
/// and, for two-headed checkpoints, a sigmoid value head.
#[derive(Debug, Clone)]
pub struct DensePolicyValueNet {
    fingerprint: HashedFingerprint,
    hidden: Linear,
    policy: Linear,
    value: Option<Linear>,
}

impl DensePolicyValueNet {
    /// Load weights from a safetensors checkpoint.
    ///
    /// `rule_count` must match the policy head width so output `i` addresses `RuleId(i)`.
    pub fn load(
        path: impl AsRef<Path>,
        fingerprint: HashedFingerprint,
        rule_count: usize,
    ) -> Result<Self> {
        log::info!("🧠 Loading policy network from {}", path.as_ref().display());
        let tensors = load_tensors(path)?;
        let net = Self::from_tensors(tensors, fingerprint, rule_count)?;
        log::info!(
            "✅ Policy network ready: {} -> {} -> {} rules (value head: {})",
            net.hidden.in_dim,
            net.hidden.out_dim,
            net.policy.out_dim,
            net.value.is_some()
        );
        Ok(net)
    }

    pub fn from_tensors(
        mut tensors: HashMap<String, DenseTensor>,
        fingerprint: HashedFingerprint,
        rule_count: usize,
    ) -> Result<Self> {
        let mut take = |name: &str| {
            tensors
                .remove(name)
                .ok_or_else(|| RetroError::Artifact(format!("checkpoint is missing '{name}'")))
        };

        let hidden = Linear::from_tensors(take("hidden.weight")?, take("hidden.bias")?, "hidden")?;
        let policy = Linear::from_tensors(take("policy.weight")?, take("policy.bias")?, "policy")?;
        let value = match (take("value.weight"), take("value.bias")) {
            (Ok(weight), Ok(bias)) => Some(Linear::from_tensors(weight, bias, "value")?),
            _ => None,
        };

        if hidden.in_dim != fingerprint.length {
            return Err(RetroError::Artifact(format!(
                "hidden layer expects {} inputs but fingerprint length is {}",
                hidden.in_dim, fingerprint.length
            )));
        }
        if policy.in_dim != hidden.out_dim {
            return Err(RetroError::Artifact(format!(
                "policy head expects {} inputs, hidden layer yields {}",
                policy.in_dim, hidden.out_dim
            )));
        }
        if policy.out_dim != rule_count {
            return Err(RetroError::Artifact(format!(
                "policy head has {} outputs but the rule set holds {} rules",
                policy.out_dim, rule_count
            )));
        }
        if let Some(value) = &value {
            if value.in_dim != hidden.out_dim || value.out_dim != 1 {
                return Err(RetroError::Artifact(format!(
                    "value head must map {} inputs to 1 output",
                    hidden.out_dim
                )));
            }
        }

        Ok(Self {
            fingerprint,
            hidden,
            policy,
            value,
        })
    }

    /// Rule probabilities and optional value for one molecule.
    pub fn forward(&self, molecule: &Molecule) -> (Vec<f32>, Option<f32>) {
        let active = self.fingerprint.active_bits(molecule);
        let hidden: Vec<f32> = self
            .hidden
            .forward_sparse(&active)
            .into_iter()
            .map(|x| x.max(0.0))
            .collect();
        let policy = self.policy.forward(&hidden).into_iter().map(sigmoid).collect();
        let value = self
            .value
            .as_ref()
            .map(|head| sigmoid(head.forward(&hidden)[0]));
        (policy, value)
    }
}

impl RuleRanker for DensePolicyValueNet {
    fn rank(&self, molecule: &Molecule, top_n: usize) -> RuleRanking {
        let (policy, value) = self.forward(molecule);
        RuleRanking {
            candidates: top_candidates(&policy, top_n),
            value: value.map(f64::from),
        }
    }

    fn has_value_head(&self) -> bool {
        self.value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::rules::RuleId;
    use crate::neural::model_io::save_tensors;

    const FP: HashedFingerprint = HashedFingerprint {
        length: 16,
        min_radius: 2,
        max_radius: 3,
        bits_per_feature: 2,
    };

    fn tensors(with_value: bool) -> HashMap<String, DenseTensor> {
        let mut tensors = HashMap::new();
        // Hidden unit 0 always fires through its bias, unit 1 never does.
        tensors.insert(
            "hidden.weight".to_string(),
            DenseTensor::new(vec![2, 16], vec![0.0; 32]).unwrap(),
        );
        tensors.insert(
            "hidden.bias".to_string(),
            DenseTensor::new(vec![2], vec![1.0, -1.0]).unwrap(),
        );
        tensors.insert(
            "policy.weight".to_string(),
            DenseTensor::new(vec![3, 2], vec![-2.0, 0.0, 3.0, 0.0, 0.5, 0.0]).unwrap(),
        );
        tensors.insert(
            "policy.bias".to_string(),
            DenseTensor::new(vec![3], vec![0.0; 3]).unwrap(),
        );
        if with_value {
            tensors.insert(
                "value.weight".to_string(),
                DenseTensor::new(vec![1, 2], vec![0.0, 0.0]).unwrap(),
            );
            tensors.insert(
                "value.bias".to_string(),
                DenseTensor::new(vec![1], vec![0.0]).unwrap(),
            );
        }
        tensors
    }

    #[test]
    fn test_policy_ranking_order() {
        let net = DensePolicyValueNet::from_tensors(tensors(false), FP, 3).unwrap();
        let ranking = net.rank(&Molecule::from("CCO"), 2);
        let ids: Vec<RuleId> = ranking.candidates.iter().map(|c| c.rule).collect();
        assert_eq!(ids, vec![RuleId(1), RuleId(2)]);
        assert!((ranking.candidates[0].probability - sigmoid(3.0) as f64).abs() < 1e-6);
        assert_eq!(ranking.value, None);
        assert!(!net.has_value_head());
    }

    #[test]
    fn test_value_head() {
        let net = DensePolicyValueNet::from_tensors(tensors(true), FP, 3).unwrap();
        let ranking = net.rank(&Molecule::from("CCO"), 3);
        assert!(net.has_value_head());
        assert!((ranking.value.unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_rule_count_mismatch_is_fatal() {
        let err = DensePolicyValueNet::from_tensors(tensors(false), FP, 5).unwrap_err();
        assert!(matches!(err, RetroError::Artifact(_)));
    }

    #[test]
    fn test_fingerprint_length_mismatch_is_fatal() {
        let fp = HashedFingerprint::default();
        assert!(DensePolicyValueNet::from_tensors(tensors(false), fp, 3).is_err());
    }

    #[test]
    fn test_load_from_safetensors_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("twohead.safetensors");
        save_tensors(&tensors(true), &path).unwrap();

        let net = DensePolicyValueNet::load(&path, FP, 3).unwrap();
        assert!(net.has_value_head());
    }
}
