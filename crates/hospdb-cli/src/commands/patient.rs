//! Patient commands

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use hospdb_core::{EntityGraph, Patient, PersistentObject};
use hospdb_engine::ClinicService;

use super::{CommandResult, Output};

#[derive(Debug, Args)]
pub struct PatientArgs {
    #[command(subcommand)]
    pub command: PatientCommand,
}

#[derive(Debug, Subcommand)]
pub enum PatientCommand {
    /// Register a patient
    Add(AddArgs),
    /// List patients, optionally filtered
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub lastname: String,

    #[arg(long)]
    pub firstname: String,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub born: Option<NaiveDate>,

    /// Health insurance company
    #[arg(long)]
    pub insurance: Option<String>,

    #[arg(long)]
    pub insurance_number: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Last name, SQL LIKE pattern
    #[arg(long)]
    pub lastname: Option<String>,

    /// First name, SQL LIKE pattern
    #[arg(long)]
    pub firstname: Option<String>,

    #[arg(long)]
    pub born_from: Option<NaiveDate>,

    #[arg(long)]
    pub born_until: Option<NaiveDate>,
}

pub fn execute(args: PatientArgs, service: &mut ClinicService, output: &Output) -> CommandResult {
    match args.command {
        PatientCommand::Add(add) => execute_add(add, service, output),
        PatientCommand::List(list) => execute_list(list, service, output),
    }
}

fn execute_add(args: AddArgs, service: &mut ClinicService, output: &Output) -> CommandResult {
    let mut graph = EntityGraph::new();
    let key = service.create_patient(&mut graph, &args.lastname, &args.firstname)?;

    let patient = graph.patient_mut(key)?;
    patient.person_mut().set_date_of_birth(args.born)?;
    patient.set_health_insurance(args.insurance);
    patient.set_insurance_number(args.insurance_number);

    let id = service.store(&mut graph, key)?;
    output.emit(graph.patient(key)?, || println!("Patient {} created", id))
}

fn execute_list(args: ListArgs, service: &mut ClinicService, output: &Output) -> CommandResult {
    let mut graph = EntityGraph::new();
    let keys = service.get_patients(
        &mut graph,
        args.lastname.as_deref(),
        args.firstname.as_deref(),
        args.born_from,
        args.born_until,
    )?;
    let patients = keys
        .into_iter()
        .map(|key| graph.patient(key))
        .collect::<Result<Vec<&Patient>, _>>()?;

    output.emit(&patients, || {
        println!(
            "{:>6}  {:<20}  {:<20}  {:<10}  {:<20}",
            "ID", "LASTNAME", "FIRSTNAME", "BORN", "INSURANCE"
        );
        for patient in &patients {
            let person = patient.person();
            println!(
                "{:>6}  {:<20}  {:<20}  {:<10}  {:<20}",
                patient.object_id(),
                person.lastname(),
                person.firstname(),
                person
                    .date_of_birth()
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                patient.health_insurance().unwrap_or("")
            );
        }
    })
}
