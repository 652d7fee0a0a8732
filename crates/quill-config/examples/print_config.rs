/// Example program to print the loaded configuration
///
/// Run with: cargo run -p quill-config --example print_config

fn main() {
    let config = quill_config::QuillConfig::load();

    println!("=== Quill Configuration ===\n");

    println!("Style Settings:");
    println!("  Base Font Size: {}", config.style.base_font_size);
    println!("  Max Rules: {}", config.style.max_rules);
    println!("  Max Import Depth: {}", config.style.max_import_depth);
    println!();

    println!("Layout Settings:");
    println!("  Char Width: {}", config.layout.char_width);
    println!("  Line Height: {}", config.layout.line_height);
    println!("  Bullet Gap: {}", config.layout.bullet_gap);
    println!();

    println!("Diagnostics: {:?}", config.diagnostics);
}
