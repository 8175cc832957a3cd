use metrosim::core::forcefield::pair::LennardJonesCoulomb;
use metrosim::core::forcefield::params::{AtomTypeParams, ForcefieldParams};
use metrosim::core::io::setup::{MoleculeTemplate, TemplateAtom, build_box};
use metrosim::core::io::state::{StateFile, StateMetadata};
use metrosim::core::io::traits::BoxFile;
use metrosim::core::models::atom::Atom;
use metrosim::core::models::environment::Environment;
use metrosim::core::models::molecule::Molecule;
use metrosim::core::models::system::SimulationBox;
use metrosim::engine::config::RunConfig;
use metrosim::engine::evaluator::{Backend, EvaluatorOptions, agree_within, create_evaluator};
use metrosim::engine::metropolis::MetropolisDriver;
use metrosim::engine::progress::ProgressReporter;
use metrosim::engine::sink::NullSink;
use metrosim::engine::state::RunSummary;
use nalgebra::Point3;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn water_template() -> MoleculeTemplate {
    let atom = |name: &str, atom_type: &str, position: [f64; 3]| TemplateAtom {
        name: name.to_string(),
        atom_type: atom_type.to_string(),
        position,
    };
    MoleculeTemplate {
        name: Some("water".to_string()),
        atoms: vec![
            atom("O", "OW", [0.0, 0.0, 0.0]),
            atom("H1", "HW", [0.9572, 0.0, 0.0]),
            atom("H2", "HW", [-0.2400, 0.9266, 0.0]),
        ],
    }
}

fn water_params() -> ForcefieldParams {
    let mut params = ForcefieldParams::new();
    params.insert(
        "OW",
        AtomTypeParams {
            sigma: 3.15365,
            epsilon: 0.155,
            charge: -0.834,
        },
    );
    params.insert(
        "HW",
        AtomTypeParams {
            sigma: 1.0,
            epsilon: 0.05,
            charge: 0.417,
        },
    );
    params
}

fn environment(seed: u64) -> Environment {
    Environment {
        dimensions: [14.0, 14.0, 14.0],
        temperature: 298.15,
        max_translation: 0.15,
        max_rotation: 15.0,
        cutoff: 7.0,
        seed,
        molecule_count: 5,
        primary_atom_index: 0,
    }
}

fn water_box(seed: u64) -> SimulationBox {
    let mut rng = StdRng::seed_from_u64(seed);
    build_box(environment(seed), &water_template(), &water_params(), &mut rng).unwrap()
}

fn run_config(backend: Backend, steps: usize) -> RunConfig {
    RunConfig {
        backend,
        steps,
        status_interval: 100,
        state_interval: 0,
        save_final_state: false,
        energy_tolerance: 1e-3,
        include_intramolecular: false,
    }
}

fn run(backend: Backend, seed: u64, steps: usize) -> (RunSummary, SimulationBox) {
    let mut sim_box = water_box(seed);
    let evaluator = create_evaluator(backend, LennardJonesCoulomb, EvaluatorOptions::default());
    let mut driver = MetropolisDriver::new(evaluator.as_ref(), &sim_box);
    let summary = driver
        .run(
            &mut sim_box,
            &run_config(backend, steps),
            0,
            &mut NullSink,
            &ProgressReporter::new(),
        )
        .unwrap();
    (summary, sim_box)
}

#[test]
fn final_energy_is_initial_plus_accepted_deltas() {
    let mut sim_box = water_box(17);
    let evaluator = create_evaluator(
        Backend::Sequential,
        LennardJonesCoulomb,
        EvaluatorOptions::default(),
    );
    let mut driver = MetropolisDriver::new(evaluator.as_ref(), &sim_box);
    let initial = driver.current_energy();

    let steps = 300;
    let mut accepted_delta_sum = 0.0;
    let mut accepted = 0;
    for _ in 0..steps {
        let outcome = driver.step(&mut sim_box).unwrap();
        if outcome.accepted {
            accepted_delta_sum += outcome.delta;
            accepted += 1;
        }
    }

    assert_eq!(driver.accepted() + driver.rejected(), steps);
    assert_eq!(driver.accepted(), accepted);
    assert!(agree_within(
        driver.current_energy(),
        initial + accepted_delta_sum,
        1e-9
    ));
    assert!(agree_within(
        driver.current_energy(),
        evaluator.system_energy(&sim_box),
        1e-6
    ));
}

#[test]
fn sequential_runs_are_deterministic_for_a_seed() {
    let (first, first_box) = run(Backend::Sequential, 12345, 1000);
    let (second, second_box) = run(Backend::Sequential, 12345, 1000);

    assert_eq!(first.accepted + first.rejected, 1000);
    assert_eq!(first.accepted, second.accepted);
    assert_eq!(first.rejected, second.rejected);
    assert_eq!(first.final_energy.to_bits(), second.final_energy.to_bits());
    assert_eq!(first_box.molecules(), second_box.molecules());
}

#[test]
fn parallel_final_energy_tracks_sequential() {
    let (sequential, _) = run(Backend::Sequential, 12345, 1000);
    let (parallel, _) = run(Backend::Parallel, 12345, 1000);

    assert_eq!(parallel.backend, Backend::Parallel);
    assert_eq!(parallel.accepted + parallel.rejected, 1000);
    assert!(
        agree_within(parallel.final_energy, sequential.final_energy, 1e-3),
        "parallel {} vs sequential {}",
        parallel.final_energy,
        sequential.final_energy
    );
}

#[test]
fn backends_agree_on_the_product_example() {
    let molecules = (0..4)
        .map(|i| {
            let atom = Atom::new(i, "X", "X", Point3::new(1.0 + 2.0 * i as f64, 1.0, 1.0))
                .with_parameters(0.0, 0.0, (i + 1) as f64);
            Molecule::new(i, vec![atom])
        })
        .collect();
    let mut env = environment(1);
    env.molecule_count = 4;
    env.cutoff = 50.0;
    let sim_box = SimulationBox::new(env, molecules).unwrap();
    let product = |a: &Atom, b: &Atom, _distance: f64| a.charge * b.charge;

    let sequential = create_evaluator(Backend::Sequential, product, EvaluatorOptions::default());
    let parallel = create_evaluator(Backend::Parallel, product, EvaluatorOptions::default());

    assert_eq!(sequential.system_energy(&sim_box), 35.0);
    assert_eq!(parallel.system_energy(&sim_box), 35.0);
}

#[test]
fn checkpoint_restores_box_and_energy() {
    let (summary, sim_box) = run(Backend::Sequential, 99, 200);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("water_200.state");

    StateFile::write_to_path(
        &sim_box,
        &StateMetadata {
            step: summary.final_step(),
        },
        &path,
    )
    .unwrap();
    let (restored, metadata) = StateFile::read_from_path(&path).unwrap();

    assert_eq!(metadata.step, 200);
    assert_eq!(restored.molecules(), sim_box.molecules());
    let evaluator = create_evaluator(
        Backend::Sequential,
        LennardJonesCoulomb,
        EvaluatorOptions::default(),
    );
    assert_eq!(
        evaluator.system_energy(&restored),
        evaluator.system_energy(&sim_box)
    );
}
