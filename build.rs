use std::fs;

use toml::Value;

const DEFAULT_CONFIG: &str = "src/default_config.toml";

// The default config is embedded with include_str!, so reject a broken one
// before it ever reaches Config::compiled_default.
fn main() {
    println!("cargo:rerun-if-changed={DEFAULT_CONFIG}");

    let content = fs::read_to_string(DEFAULT_CONFIG).expect("Failed to read default_config.toml");
    let table: toml::Table = content
        .parse()
        .unwrap_or_else(|e| panic!("Invalid {DEFAULT_CONFIG}: {e}"));

    if !table.get("converter").is_some_and(Value::is_str) {
        panic!("{DEFAULT_CONFIG}: `converter` must be a string");
    }

    let strip = table
        .get("input")
        .and_then(|input| input.get("strip_frontmatter"))
        .and_then(Value::as_bool);
    if strip.is_none() {
        panic!("{DEFAULT_CONFIG}: `input.strip_frontmatter` must be a boolean");
    }

    let indent = table
        .get("output")
        .and_then(|output| output.get("indent_width"))
        .and_then(Value::as_integer);
    if !indent.is_some_and(|width| width >= 0) {
        panic!("{DEFAULT_CONFIG}: `output.indent_width` must be a non-negative integer");
    }
}
