//! Schema bootstrap command

use hospdb_engine::ClinicService;

use super::{CommandResult, Output};

pub fn execute(service: &mut ClinicService, output: &Output) -> CommandResult {
    service.init_schema()?;
    output.emit(&serde_json::json!({ "initialized": true }), || {
        println!("Schema initialized")
    })
}
