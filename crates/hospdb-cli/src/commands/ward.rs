//! Ward commands

use clap::{Args, Subcommand};
use hospdb_core::{EntityGraph, PersistentObject, Ward};
use hospdb_engine::ClinicService;

use super::{CommandResult, Output};

#[derive(Debug, Args)]
pub struct WardArgs {
    #[command(subcommand)]
    pub command: WardCommand,
}

#[derive(Debug, Subcommand)]
pub enum WardCommand {
    /// Create a ward
    Add(AddArgs),
    /// List all wards
    List,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub beds: i32,
}

pub fn execute(args: WardArgs, service: &mut ClinicService, output: &Output) -> CommandResult {
    match args.command {
        WardCommand::Add(add) => execute_add(add, service, output),
        WardCommand::List => execute_list(service, output),
    }
}

fn execute_add(args: AddArgs, service: &mut ClinicService, output: &Output) -> CommandResult {
    let mut graph = EntityGraph::new();
    let ward = service.create_ward(&mut graph, &args.name, args.beds)?;
    let id = service.store(&mut graph, ward)?;

    output.emit(graph.ward(ward)?, || println!("Ward {} created", id))
}

fn execute_list(service: &mut ClinicService, output: &Output) -> CommandResult {
    let mut graph = EntityGraph::new();
    let keys = service.get_wards(&mut graph)?;
    let wards = keys
        .into_iter()
        .map(|key| graph.ward(key))
        .collect::<Result<Vec<&Ward>, _>>()?;

    output.emit(&wards, || {
        println!("{:>6}  {:<30}  {:>5}", "ID", "NAME", "BEDS");
        for ward in &wards {
            println!(
                "{:>6}  {:<30}  {:>5}",
                ward.object_id(),
                ward.name(),
                ward.number_of_beds()
            );
        }
    })
}
