use crate::cli::CheckArgs;
use crate::error::Result;
use mdof::engine::motion::SystemMotion;
use tracing::info;

pub fn run(args: CheckArgs) -> Result<()> {
    info!("Validating body configuration {:?}", &args.config);
    let motion = SystemMotion::from_files(&args.config, args.state.as_deref())?;
    println!("{}", describe(&motion));
    Ok(())
}

fn describe(motion: &SystemMotion) -> String {
    let mut lines = vec![
        format!("Mass: {}", motion.mass()),
        format!(
            "Moment of inertia: ({}, {}, {})",
            motion.moment_of_inertia().x,
            motion.moment_of_inertia().y,
            motion.moment_of_inertia().z
        ),
        format!("Solver: {}", motion.solver_name()),
    ];
    for restraint in motion.restraints() {
        lines.push(format!("Restraint: {} ({})", restraint.name(), restraint.type_name()));
    }
    for constraint in motion.constraints() {
        lines.push(format!("Constraint: {} ({})", constraint.name(), constraint.type_name()));
    }
    lines.join("\n")
}
