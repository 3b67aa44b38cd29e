pub mod model_io;
pub mod policy_value_net;
pub mod ranker;
#[cfg(feature = "torch")]
pub mod torch_net;

// Re-export key components for convenience
pub use policy_value_net::DensePolicyValueNet;
pub use ranker::{top_candidates, RankedRule, RuleRanker, RuleRanking, StaticPriorRanker};
#[cfg(feature = "torch")]
pub use torch_net::TorchPolicyValueNet;
