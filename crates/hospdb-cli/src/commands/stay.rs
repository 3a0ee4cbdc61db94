//! Hospital stay commands

use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use hospdb_core::{EntityGraph, PersistentObject, StayKey};
use hospdb_engine::ClinicService;
use serde::Serialize;

use super::{CommandResult, Output};

#[derive(Debug, Args)]
pub struct StayArgs {
    #[command(subcommand)]
    pub command: StayCommand,
}

#[derive(Debug, Subcommand)]
pub enum StayCommand {
    /// Admit a patient to a ward
    Admit(AdmitArgs),
    /// Set the discharge date of a stay
    Discharge(DischargeArgs),
    /// List the stays of one patient
    List(ListArgs),
    /// Delete a stay
    Remove(RemoveArgs),
}

#[derive(Debug, Args)]
pub struct AdmitArgs {
    /// Patient id
    #[arg(long)]
    pub patient: i64,

    /// Ward id
    #[arg(long)]
    pub ward: i64,

    /// Admission date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct DischargeArgs {
    /// Stay id
    #[arg(long)]
    pub id: i64,

    /// Discharge date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Patient id
    #[arg(long)]
    pub patient: i64,

    /// Only stays admitted on or after this date
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Only stays discharged on or before this date
    #[arg(long)]
    pub until: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Stay id
    #[arg(long)]
    pub id: i64,
}

/// Flattened view of a stay with its patient and ward
#[derive(Debug, Serialize)]
struct StayView {
    id: i64,
    patient_id: i64,
    patient_name: String,
    ward_id: i64,
    ward_name: String,
    admission_date: NaiveDate,
    discharge_date: Option<NaiveDate>,
}

impl StayView {
    fn from_graph(graph: &EntityGraph, key: StayKey) -> Result<Self, Box<dyn std::error::Error>> {
        let stay = graph.stay(key)?;
        let patient = graph.patient(stay.patient())?;
        let ward = graph.ward(stay.ward())?;
        Ok(Self {
            id: stay.object_id(),
            patient_id: patient.object_id(),
            patient_name: format!(
                "{}, {}",
                patient.person().lastname(),
                patient.person().firstname()
            ),
            ward_id: ward.object_id(),
            ward_name: ward.name().to_string(),
            admission_date: stay.admission_date(),
            discharge_date: stay.discharge_date(),
        })
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn execute(args: StayArgs, service: &mut ClinicService, output: &Output) -> CommandResult {
    match args.command {
        StayCommand::Admit(admit) => execute_admit(admit, service, output),
        StayCommand::Discharge(discharge) => execute_discharge(discharge, service, output),
        StayCommand::List(list) => execute_list(list, service, output),
        StayCommand::Remove(remove) => execute_remove(remove, service, output),
    }
}

fn execute_admit(args: AdmitArgs, service: &mut ClinicService, output: &Output) -> CommandResult {
    let mut graph = EntityGraph::new();
    let patient = service
        .get_patient(&mut graph, args.patient)?
        .ok_or_else(|| format!("Patient {} not found", args.patient))?;
    let ward = service
        .get_ward(&mut graph, args.ward)?
        .ok_or_else(|| format!("Ward {} not found", args.ward))?;

    let admission = args.date.unwrap_or_else(today);
    let stay = service.create_hospital_stay(&mut graph, patient, ward, admission)?;
    let id = service.store(&mut graph, stay)?;

    let view = StayView::from_graph(&graph, stay)?;
    output.emit(&view, || {
        println!(
            "Stay {} created: {} admitted to {} on {}",
            id, view.patient_name, view.ward_name, view.admission_date
        )
    })
}

fn execute_discharge(
    args: DischargeArgs,
    service: &mut ClinicService,
    output: &Output,
) -> CommandResult {
    let mut graph = EntityGraph::new();
    let stay = service
        .get_hospital_stay(&mut graph, args.id)?
        .ok_or_else(|| format!("Stay {} not found", args.id))?;

    let discharge = args.date.unwrap_or_else(today);
    graph.stay_mut(stay)?.set_discharge_date(Some(discharge))?;
    service.store(&mut graph, stay)?;

    let view = StayView::from_graph(&graph, stay)?;
    output.emit(&view, || {
        println!("Stay {} discharged on {}", view.id, discharge)
    })
}

fn execute_list(args: ListArgs, service: &mut ClinicService, output: &Output) -> CommandResult {
    let mut graph = EntityGraph::new();
    let keys = if args.from.is_some() || args.until.is_some() {
        service.get_hospital_stays_between(&mut graph, args.patient, args.from, args.until)?
    } else {
        service.get_hospital_stays(&mut graph, args.patient)?
    };
    let views = keys
        .into_iter()
        .map(|key| StayView::from_graph(&graph, key))
        .collect::<Result<Vec<_>, _>>()?;

    output.emit(&views, || {
        println!(
            "{:>6}  {:<24}  {:<20}  {:<10}  {:<10}",
            "ID", "PATIENT", "WARD", "ADMITTED", "DISCHARGED"
        );
        for view in &views {
            println!(
                "{:>6}  {:<24}  {:<20}  {:<10}  {:<10}",
                view.id,
                view.patient_name,
                view.ward_name,
                view.admission_date,
                view.discharge_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
        }
    })
}

fn execute_remove(args: RemoveArgs, service: &mut ClinicService, output: &Output) -> CommandResult {
    service.remove_hospital_stay(args.id)?;
    output.emit(&serde_json::json!({ "removed": args.id }), || {
        println!("Stay {} removed", args.id)
    })
}
