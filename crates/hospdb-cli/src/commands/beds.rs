//! Bed occupancy report

use clap::Args;
use hospdb_core::EntityGraph;
use hospdb_engine::ClinicService;

use super::{CommandResult, Output};

#[derive(Debug, Args)]
pub struct BedsArgs {
    /// Restrict the report to one ward id
    #[arg(long)]
    pub ward: Option<i64>,
}

pub fn execute(args: BedsArgs, service: &mut ClinicService, output: &Output) -> CommandResult {
    let mut graph = EntityGraph::new();
    let ward = match args.ward {
        Some(id) => Some(
            service
                .get_ward(&mut graph, id)?
                .ok_or_else(|| format!("Ward {} not found", id))?,
        ),
        None => None,
    };

    let report = service.bed_report(&graph, ward)?;
    output.emit(&report, || {
        match report.ward_id {
            Some(id) => println!("Ward {}", id),
            None => println!("All wards"),
        }
        println!("  free beds:          {}", report.free_beds);
        println!("  allocated beds:     {}", report.allocated_beds);
        println!("  average stay days:  {:.2}", report.average_stay_days);
    })
}
