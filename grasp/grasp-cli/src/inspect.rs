//! `grasp inspect`: summarize stored grasps.

use std::path::Path;

use anyhow::{Context, Result, bail};
use grasp_io::{GraspFile, load_grasps, load_object_grasps};
use grasp_types::{Aabb, Point3};
use owo_colors::OwoColorize;

pub fn run(path: &Path, object: Option<&str>, limit: usize) -> Result<()> {
    let file = if path.is_dir() {
        let Some(object) = object else {
            bail!("{} is a directory; pass --object to select grasps", path.display());
        };
        load_object_grasps(path, object)
            .with_context(|| format!("Failed to read grasps from {}", path.display()))?
            .with_context(|| format!("No grasp files for {object} in {}", path.display()))?
    } else {
        load_grasps(path).with_context(|| format!("Failed to read {}", path.display()))?
    };

    print_summary(&file, limit);
    Ok(())
}

fn print_summary(file: &GraspFile, limit: usize) {
    println!();
    println!("{} {}", "Object:".bold(), file.object);
    println!("{} {}", "Grasps:".bold(), file.grasps.len());

    if file.grasps.is_empty() {
        return;
    }

    let centers: Vec<Point3<f64>> = file.poses().iter().map(|p| p.position()).collect();
    let bounds = Aabb::from_points(&centers);
    let size = bounds.size();
    println!(
        "{} [{:.4}, {:.4}, {:.4}] .. [{:.4}, {:.4}, {:.4}] (extent {:.4} x {:.4} x {:.4})",
        "Centers:".bold(),
        bounds.min.x,
        bounds.min.y,
        bounds.min.z,
        bounds.max.x,
        bounds.max.y,
        bounds.max.z,
        size.x,
        size.y,
        size.z
    );

    let off_unit = file
        .grasps
        .iter()
        .filter(|g| {
            let q = g.orientation;
            ((q.w * q.w + q.x * q.x + q.y * q.y + q.z * q.z).sqrt() - 1.0).abs() > 1e-6
        })
        .count();
    if off_unit > 0 {
        println!(
            "{}",
            format!("⚠ {off_unit} grasps have non-unit quaternions").yellow()
        );
    }

    println!();
    println!(
        "{}",
        format!(
            "{:>5}  {:>10} {:>10} {:>10}  {:>8} {:>8} {:>8} {:>8}",
            "id", "x", "y", "z", "qw", "qx", "qy", "qz"
        )
        .dimmed()
    );
    for g in file.grasps.iter().take(limit) {
        let (p, q) = (g.position, g.orientation);
        println!(
            "{:>5}  {:>10.4} {:>10.4} {:>10.4}  {:>8.4} {:>8.4} {:>8.4} {:>8.4}",
            g.id, p.x, p.y, p.z, q.w, q.x, q.y, q.z
        );
    }
    if file.grasps.len() > limit {
        println!("{}", format!("... {} more", file.grasps.len() - limit).dimmed());
    }
}
