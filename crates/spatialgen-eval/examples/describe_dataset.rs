use std::env;
use std::path::PathBuf;

use spatialgen_core::{GeometryKind, OutputFormat};
use spatialgen_eval::describe;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let mut path: Option<PathBuf> = None;
    let mut kind = GeometryKind::Point;
    let mut format: Option<OutputFormat> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--geo" => kind = args.next().ok_or("missing --geo value")?.parse()?,
            "--format" => format = Some(args.next().ok_or("missing --format value")?.parse()?),
            _ => {
                if path.is_none() {
                    path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let path = path.ok_or("missing dataset path")?;
    let format = match format {
        Some(format) => format,
        None => path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("csv")
            .parse()?,
    };

    let metrics = describe(&path, kind, format)?;
    println!("{}", metrics.to_json_pretty()?);
    Ok(())
}
