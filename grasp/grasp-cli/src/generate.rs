//! `grasp generate`: sample grasps for one mesh.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Args;
use grasp_antipodal::{AntipodalGraspGenerator, AntipodalParams, GraspGenerator};
use grasp_io::{GraspFile, load_mesh, save_grasps};
use grasp_types::MeshTopology;
use owo_colors::OwoColorize;

/// Arguments for `grasp generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Mesh file (.stl or .obj)
    #[arg(name = "MESH")]
    pub mesh: PathBuf,

    /// Number of grasps to sample
    #[arg(short = 'n', long, default_value_t = 100)]
    pub num: usize,

    /// JSON file with sampling parameters; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Concentration of the approach perturbation
    #[arg(long)]
    pub kappa: Option<f64>,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Contact-search batches before giving up (0 for no limit)
    #[arg(long)]
    pub max_batches: Option<usize>,

    /// Object id stored in the grasp set (defaults to the mesh file stem)
    #[arg(long)]
    pub object: Option<String>,

    /// Output path (defaults to `<OBJECT>_grasps.json` in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &GenerateArgs) -> Result<()> {
    let params = resolve_params(args)?;
    let object = object_id(args)?;

    let mesh = load_mesh(&args.mesh)
        .with_context(|| format!("Failed to load mesh {}", args.mesh.display()))?;
    println!(
        "{} {} ({} faces, {} vertices)",
        "Loaded".dimmed(),
        args.mesh.display(),
        mesh.face_count(),
        mesh.vertex_count()
    );

    let generator = AntipodalGraspGenerator::new(params);
    let start = Instant::now();
    let poses = generator
        .generate_grasps(&mesh, args.num)
        .with_context(|| format!("Failed to generate grasps for {object}"))?;
    let elapsed = start.elapsed();

    let file = GraspFile::from_poses(object, &poses);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(file.default_file_name()));
    save_grasps(&file, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} {} grasps for {} in {:.2?} -> {}",
        "✓".green().bold(),
        poses.len(),
        file.object.bold(),
        elapsed,
        output.display()
    );
    Ok(())
}

/// Defaults, then the config file, then explicit flags.
fn resolve_params(args: &GenerateArgs) -> Result<AntipodalParams> {
    let mut params = match &args.config {
        Some(path) => read_config(path)?,
        None => AntipodalParams::default(),
    };
    if let Some(kappa) = args.kappa {
        params.kappa = kappa;
    }
    if let Some(seed) = args.seed {
        params.seed = Some(seed);
    }
    if let Some(max) = args.max_batches {
        params.max_batches = (max > 0).then_some(max);
    }
    params.validate().context("Invalid sampling parameters")?;
    Ok(params)
}

fn read_config(path: &Path) -> Result<AntipodalParams> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))
}

fn object_id(args: &GenerateArgs) -> Result<String> {
    if let Some(object) = &args.object {
        return Ok(object.clone());
    }
    match args.mesh.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if !stem.is_empty() => Ok(stem.to_string()),
        _ => bail!(
            "Cannot derive an object id from {}; pass --object",
            args.mesh.display()
        ),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn args(mesh: &str) -> GenerateArgs {
        GenerateArgs {
            mesh: PathBuf::from(mesh),
            num: 10,
            config: None,
            kappa: None,
            seed: None,
            max_batches: None,
            object: None,
            output: None,
        }
    }

    #[test]
    fn object_defaults_to_file_stem() {
        assert_eq!(object_id(&args("meshes/mug.stl")).unwrap(), "mug");
        let mut named = args("meshes/mug.stl");
        named.object = Some("cup".into());
        assert_eq!(object_id(&named).unwrap(), "cup");
    }

    #[test]
    fn flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("params.json");
        std::fs::write(&config, r#"{"kappa": 2.0, "oversample": 3, "seed": 1}"#).unwrap();

        let mut a = args("mug.stl");
        a.config = Some(config);
        a.seed = Some(5);
        a.max_batches = Some(0);
        let params = resolve_params(&a).unwrap();

        assert!((params.kappa - 2.0).abs() < 1e-12);
        assert_eq!(params.oversample, 3);
        assert_eq!(params.seed, Some(5));
        assert_eq!(params.max_batches, None);
    }

    #[test]
    fn bad_flag_values_are_rejected() {
        let mut a = args("mug.stl");
        a.kappa = Some(-1.0);
        assert!(resolve_params(&a).is_err());
    }
}
