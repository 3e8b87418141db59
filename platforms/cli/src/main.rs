use clap::Parser;
use std::path::Path;
use std::process;

use catur::automaton::{CellularAutomaton, RunOptions};
use catur::compiler::compile;
use catur::loader::{LoadedDefinition, ProgramLoader};
use catur::machine::TuringMachine;
use catur::types::{AutomatonDefinition, MachineDefinition, StopReason, DEFAULT_STEP_LIMIT};

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The definition file to run (.ca or .tm)
    #[clap(short, long)]
    program: String,

    /// Maximum number of steps to simulate
    #[clap(short, long, default_value_t = DEFAULT_STEP_LIMIT)]
    steps: usize,

    /// Stop the automaton as soon as its configuration is stable
    #[clap(long)]
    stable: bool,

    /// Compile the machine to a cellular automaton and run both side by side
    #[clap(short, long)]
    compile: bool,
}

fn main() {
    let cli = Cli::parse();

    let definition = ProgramLoader::load_definition(Path::new(&cli.program))
        .unwrap_or_else(|e| fail(&e.to_string()));

    match definition {
        LoadedDefinition::Automaton(definition) => run_automaton(definition, &cli),
        LoadedDefinition::Machine(definition) if cli.compile => run_compiled(definition, &cli),
        LoadedDefinition::Machine(definition) => run_machine(definition, &cli),
    }
}

fn run_automaton(definition: AutomatonDefinition, cli: &Cli) {
    println!("{}", definition.name);

    let mut automaton = CellularAutomaton::new(definition);
    let run = automaton.run(&RunOptions {
        max_steps: Some(cli.steps),
        stop_on_stable: cli.stable,
        ..Default::default()
    });

    for (step, configuration) in run.trace.iter().enumerate() {
        println!("{step:02} : {configuration}");
    }

    match run.reason {
        StopReason::Stable => println!("Stopped: stable configuration"),
        StopReason::TransitionSeen(_) => println!("Stopped: transition seen"),
        StopReason::StepLimit => println!("Stopped: step limit reached"),
    }
}

fn run_machine(definition: MachineDefinition, cli: &Cli) {
    println!("{}", definition.name);

    let mut machine = TuringMachine::new(definition);
    let run = machine.run(Some(cli.steps));

    for (step, configuration) in run.trace.iter().enumerate() {
        println!("{step:02} : {configuration}");
    }

    println!("Outcome: {:?}", run.outcome);
}

fn run_compiled(definition: MachineDefinition, cli: &Cli) {
    println!("{} (machine vs compiled automaton)", definition.name);

    let mut machine = TuringMachine::new(definition.clone());
    let machine_run = machine.run(Some(cli.steps));

    let mut compiled = compile(&definition).unwrap_or_else(|e| fail(&e.to_string()));

    let mut mirrors = true;
    for (step, snapshot) in machine_run.trace.iter().enumerate() {
        let configuration = compiled.automaton().configuration().clone();
        let projection = compiled
            .project(&configuration)
            .unwrap_or_else(|e| fail(&e.to_string()));

        let agrees = projection.tape == snapshot.tape
            && projection.head == Some((snapshot.head, snapshot.state.clone()));
        mirrors &= agrees;

        println!("{step:02} : {snapshot}  |  {configuration}");
        compiled.automaton_mut().step();
    }

    println!("Machine outcome: {:?}", machine_run.outcome);
    println!(
        "Automaton mirrors machine: {}",
        if mirrors { "yes" } else { "no" }
    );
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    process::exit(1);
}
