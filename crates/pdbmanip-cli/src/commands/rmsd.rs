use super::read_structure;
use crate::cli::RmsdArgs;
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use pdbmanip::workflows;
use std::fs::File;
use std::io::BufWriter;
use tracing::info;

pub fn run(args: RmsdArgs, config: &PartialConfig) -> Result<()> {
    let rmsd_config = config.merge_rmsd(&args.selection, args.superpose, args.method)?;
    info!("Computing RMSD ({:?})", rmsd_config.mode);

    let (mobile, _) = read_structure(&args.input)?;
    let (reference, _) = read_structure(&args.reference)?;

    let series = workflows::rmsd::run_frames(&mobile, &reference, &rmsd_config)?;
    match series.records.as_slice() {
        [single] => println!("RMSD: {:.4} A", single.rmsd),
        records => {
            for record in records {
                println!("Model {:>4}  RMSD: {:.4} A", record.frame + 1, record.rmsd);
            }
        }
    }

    if let Some(path) = &args.csv {
        let file = File::create(path)?;
        series
            .write_csv(BufWriter::new(file))
            .map_err(|e| CliError::FileWriting {
                path: path.clone(),
                source: e.into(),
            })?;
        println!("RMSD series written to: {}", path.display());
    }
    Ok(())
}
