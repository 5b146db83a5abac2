use std::env;
use std::fs;
use std::path::PathBuf;

/// i.MX RT1060 DTCM base as seen from the Cortex-M7 core.
const DEFAULT_BASE: usize = 0x2000_0000;

/// Bank size as configured by the FlexRAM plugin in the boot image.
const DEFAULT_SIZE: usize = 32 * 1024;

fn parse(name: &str, default: usize) -> usize {
    println!("cargo:rerun-if-env-changed={name}");

    let Ok(raw) = env::var(name) else {
        return default;
    };
    let raw = raw.trim().replace('_', "");
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => raw.parse::<usize>(),
    };

    match parsed {
        Ok(value) => value,
        Err(err) => panic!("{name}={raw:?} is not a valid address or size: {err}"),
    }
}

fn main() {
    let base = parse("KAAL_DTCM_BASE", DEFAULT_BASE);
    let size = parse("KAAL_DTCM_SIZE", DEFAULT_SIZE);

    if size == 0 {
        panic!("KAAL_DTCM_SIZE must be non-zero");
    }
    if base.checked_add(size).is_none() {
        panic!("DTCM bank {base:#x} + {size:#x} overflows the address space");
    }

    let out = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let generated = format!(
        "// Generated by build.rs. Do not edit.\n\
         \n\
         /// Start address of the DTCM bank.\n\
         pub const DTCM_BASE: usize = {base:#x};\n\
         \n\
         /// Size of the DTCM bank in bytes. Must match the boot image.\n\
         pub const DTCM_SIZE: usize = {size:#x};\n"
    );
    fs::write(out.join("memory_config.rs"), generated).expect("write memory_config.rs");

    println!("cargo:rerun-if-changed=build.rs");
}
