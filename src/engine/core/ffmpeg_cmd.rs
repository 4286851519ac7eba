use super::args::CommandArgs;
use super::error::BuildError;
use super::job::Job;

/// Assemble the full, ordered argument list for a job
///
/// `[global] {[input options] -i input}... [-filter_complex graph]
/// {[output options] -y output}...`
///
/// The first failing input or output aborts the build and is reported by
/// index. Pure: no I/O, and the same job always yields the same tokens.
pub fn build_args(job: &Job) -> Result<CommandArgs, BuildError> {
    let mut cmd = CommandArgs::new();

    job.global.apply(&mut cmd);

    for (index, input) in job.inputs.iter().enumerate() {
        input
            .apply(&mut cmd)
            .map_err(|source| BuildError::Input { index, source })?;
    }

    if let Some(graph) = &job.complex_filter {
        let script = graph.render();
        if !script.is_empty() {
            cmd.pair("-filter_complex", script);
        }
    }

    for (index, output) in job.outputs.iter().enumerate() {
        output
            .apply(&mut cmd)
            .map_err(|source| BuildError::Output { index, source })?;
    }

    Ok(cmd)
}
