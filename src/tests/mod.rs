mod basic_assembly;
mod large_hex_literals;
