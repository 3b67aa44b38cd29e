//! LibTorch-backed policy/value network (cargo feature `torch`).
//!
//! Same topology as [`DensePolicyValueNet`](crate::neural::policy_value_net::DensePolicyValueNet),
//! built with `tch::nn` and loaded from a `VarStore` checkpoint.

use crate::chemistry::fingerprint::HashedFingerprint;
use crate::chemistry::molecule::Molecule;
use crate::neural::ranker::{top_candidates, RuleRanker, RuleRanking};
use crate::{Result, RetroError};
use std::path::Path;
use std::sync::Mutex;
use tch::{nn, nn::Module, Device, Kind, Tensor};

struct TorchLayers {
    hidden: nn::Linear,
    policy: nn::Linear,
    value: Option<nn::Linear>,
}

/// Tensors are not `Sync`, so inference is serialized behind a mutex.
pub struct TorchPolicyValueNet {
    fingerprint: HashedFingerprint,
    layers: Mutex<TorchLayers>,
    _vs: nn::VarStore,
}

impl TorchPolicyValueNet {
    pub fn load(
        path: impl AsRef<Path>,
        fingerprint: HashedFingerprint,
        hidden_size: i64,
        rule_count: usize,
        two_headed: bool,
    ) -> Result<Self> {
        let mut vs = nn::VarStore::new(Device::Cpu);
        let p = vs.root();
        let input = fingerprint.length as i64;

        let hidden = nn::linear(&p / "hidden", input, hidden_size, Default::default());
        let policy = nn::linear(
            &p / "policy",
            hidden_size,
            rule_count as i64,
            Default::default(),
        );
        let value =
            two_headed.then(|| nn::linear(&p / "value", hidden_size, 1, Default::default()));

        vs.load(path.as_ref()).map_err(|e| {
            RetroError::Artifact(format!(
                "failed to load {}: {:?}",
                path.as_ref().display(),
                e
            ))
        })?;
        log::info!("✅ Torch policy network loaded from {}", path.as_ref().display());

        Ok(Self {
            fingerprint,
            layers: Mutex::new(TorchLayers {
                hidden,
                policy,
                value,
            }),
            _vs: vs,
        })
    }

    fn forward(&self, molecule: &Molecule) -> (Vec<f32>, Option<f32>) {
        let dense = self.fingerprint.dense(molecule);
        let input = Tensor::from_slice(&dense).view([1, -1]);
        let layers = match self.layers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        tch::no_grad(|| {
            let hidden = layers.hidden.forward(&input).relu();
            let policy = layers
                .policy
                .forward(&hidden)
                .sigmoid()
                .view([-1])
                .to_kind(Kind::Float);
            let policy = match Vec::<f32>::try_from(&policy) {
                Ok(policy) => policy,
                Err(e) => {
                    log::warn!("⚠️ Policy output for {} unreadable: {}", molecule, e);
                    Vec::new()
                }
            };
            let value = layers
                .value
                .as_ref()
                .map(|head| head.forward(&hidden).sigmoid().double_value(&[0, 0]) as f32);
            (policy, value)
        })
    }
}

impl RuleRanker for TorchPolicyValueNet {
    fn rank(&self, molecule: &Molecule, top_n: usize) -> RuleRanking {
        let (policy, value) = self.forward(molecule);
        RuleRanking {
            candidates: top_candidates(&policy, top_n),
            value: value.map(f64::from),
        }
    }

    fn has_value_head(&self) -> bool {
        match self.layers.lock() {
            Ok(guard) => guard.value.is_some(),
            Err(poisoned) => poisoned.into_inner().value.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::rules::RuleId;

    const FP: HashedFingerprint = HashedFingerprint {
        length: 16,
        min_radius: 2,
        max_radius: 3,
        bits_per_feature: 2,
    };

    fn save_checkpoint(path: &Path, hidden_size: i64, rule_count: i64) {
        let vs = nn::VarStore::new(Device::Cpu);
        let p = vs.root();
        let _hidden = nn::linear(&p / "hidden", 16, hidden_size, Default::default());
        let _policy = nn::linear(&p / "policy", hidden_size, rule_count, Default::default());
        let _value = nn::linear(&p / "value", hidden_size, 1, Default::default());
        vs.save(path).unwrap();
    }

    #[test]
    fn test_single_rule_head_still_ranks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.ot");
        save_checkpoint(&path, 8, 1);

        let net = TorchPolicyValueNet::load(&path, FP, 8, 1, true).unwrap();
        let ranking = net.rank(&Molecule::from("CCO"), 5);
        assert_eq!(ranking.candidates.len(), 1);
        assert_eq!(ranking.candidates[0].rule, RuleId(0));
        assert!(ranking.value.is_some());
        assert!(net.has_value_head());
    }

    #[test]
    fn test_multi_rule_head_ranks_top_n() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("multi.ot");
        save_checkpoint(&path, 8, 4);

        let net = TorchPolicyValueNet::load(&path, FP, 8, 4, false).unwrap();
        let ranking = net.rank(&Molecule::from("CCO"), 3);
        assert_eq!(ranking.candidates.len(), 3);
        assert_eq!(ranking.value, None);
    }
}
