//! Example: Load a scene file and print its object graph.
//!
//! Run with: cargo run --example dump_scene -- path/to/scene.xml

use std::env;

use anyhow::{Context, Result};
use mitsu_scene::{Object, Property, SceneLoader};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: dump_scene <path-to-scene-xml> [name=value ...]");
        println!("\nExamples:");
        println!("  cargo run --example dump_scene -- assets/cbox.xml");
        println!("  cargo run --example dump_scene -- assets/cbox.xml spp=64");
        return Ok(());
    }

    let path = &args[1];
    let mut loader = SceneLoader::new();
    for arg in &args[2..] {
        let (name, value) = arg
            .split_once('=')
            .with_context(|| format!("argument '{}' is not of the form name=value", arg))?;
        loader.set_argument(name, value);
    }

    println!("Loading scene file: {}", path);
    let scene = loader
        .load_from_file(path)
        .with_context(|| format!("failed to load '{}'", path))?;

    let version = scene.version();
    println!(
        "\n=== Scene (version {}.{}.{}) ===",
        version.major, version.minor, version.patch
    );
    dump_object(scene.root(), 0);

    Ok(())
}

fn dump_object(obj: &Object, depth: usize) {
    let pad = "  ".repeat(depth);

    let mut header = format!("{}{:?}", pad, obj.kind());
    if let Some(plugin_type) = obj.plugin_type() {
        header.push_str(&format!(" type={}", plugin_type));
    }
    if let Some(id) = obj.id() {
        header.push_str(&format!(" id={}", id));
    }
    println!("{}", header);

    let mut names: Vec<&String> = obj.properties().keys().collect();
    names.sort();
    for name in names {
        println!("{}  .{} = {}", pad, name, format_property(obj.property(name)));
    }

    for (name, child) in obj.named_children() {
        println!("{}  [{}]:", pad, name);
        dump_object(child, depth + 2);
    }
    for child in obj.anonymous_children() {
        dump_object(child, depth + 1);
    }
}

fn format_property(prop: &Property) -> String {
    match prop {
        Property::None => "(none)".to_string(),
        Property::Bool(v) => v.to_string(),
        Property::Integer(v) => v.to_string(),
        Property::Number(v) => v.to_string(),
        Property::Vector(v) => format!("({}, {}, {})", v.x, v.y, v.z),
        Property::Rgb(c) => format!("rgb({}, {}, {})", c.r, c.g, c.b),
        Property::String(s) => format!("{:?}", s),
        Property::Spectrum(s) => match s.uniform() {
            Some(v) => format!("spectrum(uniform {})", v),
            None => format!("spectrum({} samples)", s.len()),
        },
        Property::Blackbody(b) => {
            format!("blackbody({} K, scale {})", b.temperature, b.scale)
        }
        Property::Transform(t) => format!("transform({:?})", t.to_rows_array()),
        Property::Animation(a) => format!("animation({} keyframes)", a.len()),
    }
}
