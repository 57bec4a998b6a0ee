use dropwise_engine::PieceSeed;
use dropwise_evaluator::weights::WeightVector;
use dropwise_training::genetic::EvolutionParams;
use serde::{Deserialize, Serialize};

/// Result of a `train` run; `auto-play --weights` reads it back.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrainedWeights {
    pub fitness: f64,
    pub generations: usize,
    pub seed: PieceSeed,
    pub evolution: EvolutionParams,
    pub weights: WeightVector,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trained_weights_json() {
        let trained = TrainedWeights {
            fitness: 1234.5,
            generations: 3,
            seed: PieceSeed::from(7),
            evolution: EvolutionParams::default(),
            weights: WeightVector::new([-1.5, 40.0, -80.25, -10.0, -2.0]),
        };
        let json = serde_json::to_value(&trained).unwrap();
        assert_eq!(json["seed"], "00000000000000000000000000000007");
        assert_eq!(json["weights"].as_array().unwrap().len(), 5);
        assert_eq!(serde_json::from_value::<TrainedWeights>(json).unwrap(), trained);
    }
}
