//! Simulation of frozen netlists
//!
//! Five interchangeable engines share the same netlist substrate and the same
//! `(netlist, vector, options)` contract. On race-free acyclic netlists they
//! agree on the final output values; the traces, hazard reports and per-gate
//! evaluation counts are where they differ, and that difference is the point.

mod event_list;
mod gate_list;
pub mod hazard;
mod levelized;
mod result;
mod state;
mod threaded;
mod two_list;

use fxhash::FxHashMap;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

pub use hazard::Hazard;
pub use result::{Transition, VectorResult};

use crate::error::Result;
use crate::logic::{LogicModel, Value};
use crate::netlist::Netlist;
use state::SimState;

/// One assignment of values to primary inputs, by net name
///
/// Inputs absent from the mapping keep their starting value.
pub type InputVector = FxHashMap<String, Value>;

/// Knobs common to all engines
#[derive(Debug, Clone)]
pub struct SimOptions {
    /// Logic model the vector runs under
    pub model: LogicModel,
    /// Unit or execution cap for the event-driven engines
    pub max_steps: usize,
    /// Pass cap for the zero-delay feedback iteration
    pub max_passes: usize,
    /// Initial net value in 3-valued mode; 2-valued mode always resets to 0
    pub initial: Value,
    /// Make the zero-delay levelized engine refuse feedback outright
    pub strict_levelized: bool,
    /// Assignment settled silently before the vector is applied
    ///
    /// This is how an input transition is expressed: the traced episode runs
    /// from the settled baseline state to the vector. Without a baseline the
    /// episode starts from the reset state.
    pub baseline: Option<InputVector>,
}

impl Default for SimOptions {
    fn default() -> Self {
        SimOptions {
            model: LogicModel::Two,
            max_steps: 10_000,
            max_passes: 64,
            initial: Value::Unknown,
            strict_levelized: false,
            baseline: None,
        }
    }
}

/// The available simulation engines
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Engine {
    /// Two-list unit-delay event-driven scheduling
    TwoList,
    /// Single time-stamped event queue with cancellation
    EventList,
    /// Gate-only scheduling with unit-boundary commits
    GateList,
    /// Zero-delay sweep in level order with feedback iteration
    Levelized,
    /// Stack-driven execution of per-gate thunks
    Threaded,
}

impl Engine {
    /// All engines, in a fixed order
    pub const ALL: [Engine; 5] = [
        Engine::TwoList,
        Engine::EventList,
        Engine::GateList,
        Engine::Levelized,
        Engine::Threaded,
    ];

    /// Short name used in logs and on the command line
    pub fn name(self) -> &'static str {
        match self {
            Engine::TwoList => "two-list",
            Engine::EventList => "event-list",
            Engine::GateList => "gate-list",
            Engine::Levelized => "levelized",
            Engine::Threaded => "threaded",
        }
    }

    /// Simulate one vector
    ///
    /// The netlist is only borrowed; repeating the call with the same
    /// arguments yields an equal [`VectorResult`].
    pub fn simulate_vector(
        self,
        netlist: &Netlist,
        vector: &InputVector,
        options: &SimOptions,
    ) -> Result<VectorResult> {
        let stim = state::resolve_stimulus(netlist, vector, options.model)?;
        let baseline = match &options.baseline {
            Some(b) => Some(state::resolve_stimulus(netlist, b, options.model)?),
            None => None,
        };

        let mut state = SimState::new(netlist, options);
        if let Some(base) = baseline {
            state.recording = false;
            self.run(&mut state, &base, true, options)?;
            state.recording = true;
            self.run(&mut state, &stim, false, options)?;
        } else {
            self.run(&mut state, &stim, true, options)?;
        }

        let outputs = netlist
            .outputs()
            .iter()
            .map(|&n| (netlist.net(n).name.clone(), state.values[n]))
            .collect();
        let hazards = hazard::classify(&state.trace, netlist);
        debug!(
            engine = self.name(),
            transitions = state.trace.len(),
            evals = state.evals.iter().sum::<u64>(),
            "vector simulated"
        );
        Ok(VectorResult {
            outputs,
            trace: state.trace,
            evals: state.evals,
            hazards,
        })
    }

    /// Simulate a sequence of vectors
    ///
    /// Every vector is an independent episode; nothing is shared between
    /// them. Fails on the first vector that does not converge.
    pub fn simulate_sequence(
        self,
        netlist: &Netlist,
        vectors: &[InputVector],
        options: &SimOptions,
    ) -> Result<Vec<VectorResult>> {
        vectors
            .iter()
            .map(|v| self.simulate_vector(netlist, v, options))
            .collect()
    }

    fn run(
        self,
        state: &mut SimState,
        stim: &[(usize, Value)],
        seed_all: bool,
        options: &SimOptions,
    ) -> Result<()> {
        match self {
            Engine::TwoList => two_list::run(state, stim, seed_all, options),
            Engine::EventList => event_list::run(state, stim, seed_all, options),
            Engine::GateList => gate_list::run(state, stim, seed_all, options),
            Engine::Levelized => levelized::run(state, stim, seed_all, options),
            Engine::Threaded => threaded::run(state, stim, seed_all, options),
        }
    }
}

impl core::fmt::Display for Engine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Generate reproducible random two-valued vectors for a netlist
pub fn generate_random_vectors(netlist: &Netlist, nb: usize, seed: u64) -> Vec<InputVector> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut ret = Vec::new();
    for _ in 0..nb {
        ret.push(
            netlist
                .inputs()
                .iter()
                .map(|&n| {
                    let value = if rng.gen() { Value::One } else { Value::Zero };
                    (netlist.net(n).name.clone(), value)
                })
                .collect(),
        );
    }
    ret
}


#[cfg(test)]
mod tests {
    use super::testing::vector;
    use super::*;
    use crate::logic::GateKind::*;
    use crate::logic::Value::*;
    use crate::netlist::CircuitBuilder;

    fn and_or() -> Netlist {
        let mut builder = CircuitBuilder::new();
        builder.add_inputs(["a", "b", "c"]).unwrap();
        builder.add_gate(And, &["a", "b"], "x").unwrap();
        builder.add_gate(Or, &["x", "c"], "y").unwrap();
        builder.add_output("y").unwrap();
        builder.freeze().unwrap()
    }

    // A reconvergent circuit with a couple of inverters and a Xor, enough to
    // shake out scheduling differences
    fn reconvergent() -> Netlist {
        let mut builder = CircuitBuilder::new();
        builder.add_inputs(["a", "b", "c", "d"]).unwrap();
        builder.add_gate(Not, &["a"], "na").unwrap();
        builder.add_gate(And, &["a", "b"], "t1").unwrap();
        builder.add_gate(And, &["na", "c"], "t2").unwrap();
        builder.add_gate(Or, &["t1", "t2"], "u").unwrap();
        builder.add_gate(Xor, &["u", "d"], "v").unwrap();
        builder.add_gate(Nand, &["u", "v"], "w").unwrap();
        builder.add_gate(Nor, &["v", "w"], "z").unwrap();
        builder.add_outputs(["u", "v", "w", "z"]).unwrap();
        builder.freeze().unwrap()
    }

    #[test]
    fn test_engines_agree_on_finals() {
        let netlist = reconvergent();
        let options = SimOptions::default();
        for stim in generate_random_vectors(&netlist, 32, 1) {
            let reference = Engine::TwoList
                .simulate_vector(&netlist, &stim, &options)
                .unwrap();
            for engine in Engine::ALL {
                let res = engine.simulate_vector(&netlist, &stim, &options).unwrap();
                assert_eq!(
                    res.outputs(),
                    reference.outputs(),
                    "{} disagrees on {:?}",
                    engine,
                    stim
                );
            }
        }
    }

    #[test]
    fn test_engines_agree_with_baseline() {
        let netlist = reconvergent();
        let vectors = generate_random_vectors(&netlist, 16, 7);
        for pair in vectors.windows(2) {
            let options = SimOptions {
                baseline: Some(pair[0].clone()),
                ..SimOptions::default()
            };
            let reference = Engine::TwoList
                .simulate_vector(&netlist, &pair[1], &options)
                .unwrap();
            for engine in Engine::ALL {
                let res = engine
                    .simulate_vector(&netlist, &pair[1], &options)
                    .unwrap();
                assert_eq!(res.outputs(), reference.outputs(), "{}", engine);
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let netlist = reconvergent();
        let options = SimOptions::default();
        for stim in generate_random_vectors(&netlist, 8, 3) {
            for engine in Engine::ALL {
                let first = engine.simulate_vector(&netlist, &stim, &options).unwrap();
                let second = engine.simulate_vector(&netlist, &stim, &options).unwrap();
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn test_sequence_shares_nothing() {
        let netlist = reconvergent();
        let options = SimOptions::default();
        let vectors = generate_random_vectors(&netlist, 4, 11);
        for engine in Engine::ALL {
            let seq = engine
                .simulate_sequence(&netlist, &vectors, &options)
                .unwrap();
            let alone = engine
                .simulate_vector(&netlist, &vectors[3], &options)
                .unwrap();
            assert_eq!(seq[3], alone);
        }
    }

    #[test]
    fn test_trace_is_time_monotonic() {
        let netlist = reconvergent();
        let options = SimOptions::default();
        for stim in generate_random_vectors(&netlist, 8, 5) {
            for engine in Engine::ALL {
                let res = engine.simulate_vector(&netlist, &stim, &options).unwrap();
                assert!(res.trace().windows(2).all(|w| w[0].time <= w[1].time));
            }
        }
    }

    #[test]
    fn test_unknown_propagates() {
        let netlist = and_or();
        let options = SimOptions {
            model: LogicModel::Three,
            ..SimOptions::default()
        };
        let stim = vector(&[("a", Unknown), ("b", One), ("c", Zero)]);
        for engine in Engine::ALL {
            let res = engine.simulate_vector(&netlist, &stim, &options).unwrap();
            assert_eq!(res.output("y"), Some(Unknown), "{}", engine);
            assert!(!res.has_hazards());
        }
    }

    #[test]
    fn test_unknown_rejected_two_valued() {
        let netlist = and_or();
        let stim = vector(&[("a", Unknown), ("b", One), ("c", Zero)]);
        let err = Engine::TwoList
            .simulate_vector(&netlist, &stim, &SimOptions::default())
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::BadValue(_)));
    }

    #[test]
    fn test_unknown_input_name() {
        let netlist = and_or();
        let stim = vector(&[("nope", One)]);
        let err = Engine::TwoList
            .simulate_vector(&netlist, &stim, &SimOptions::default())
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::UnknownNet(name) if name == "nope"));
        // An internal net is not a primary input either
        let stim = vector(&[("x", One)]);
        let err = Engine::TwoList
            .simulate_vector(&netlist, &stim, &SimOptions::default())
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::UnknownNet(_)));
    }

    #[test]
    fn test_eval_counts_on_sensitized_path() {
        // Balanced 4-input Xor tree, one leaf toggling: the gate-driven count
        // is exactly the sensitized path, the two-list count within one
        let mut builder = CircuitBuilder::new();
        builder.add_inputs(["a", "b", "c", "d"]).unwrap();
        builder.add_gate(Xor, &["a", "b"], "l").unwrap();
        builder.add_gate(Xor, &["c", "d"], "r").unwrap();
        builder.add_gate(Xor, &["l", "r"], "y").unwrap();
        builder.add_output("y").unwrap();
        let netlist = builder.freeze().unwrap();

        let base = vector(&[("a", Zero), ("b", One), ("c", Zero), ("d", One)]);
        let mut toggled = base.clone();
        toggled.insert("a".to_string(), One);
        let options = SimOptions {
            baseline: Some(base),
            ..SimOptions::default()
        };
        let gate_driven = Engine::GateList
            .simulate_vector(&netlist, &toggled, &options)
            .unwrap();
        assert_eq!(gate_driven.total_evals(), 2);
        let two_list = Engine::TwoList
            .simulate_vector(&netlist, &toggled, &options)
            .unwrap();
        assert!(two_list.total_evals().abs_diff(gate_driven.total_evals()) <= 1);
        assert_eq!(two_list.output("y"), gate_driven.output("y"));
    }

    #[test]
    fn test_random_vectors_are_reproducible() {
        let netlist = and_or();
        let a = generate_random_vectors(&netlist, 8, 42);
        let b = generate_random_vectors(&netlist, 8, 42);
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        for v in &a {
            assert_eq!(v.len(), 3);
        }
    }
}
