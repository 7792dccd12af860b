#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let catalog = linq_lang::Catalog::new(512);
        let source = linq_ir::pipe_to_lines(s);
        let _ = linq_ir::compile(&source, &catalog, &linq_ir::CompileOptions::unbounded());
        let _ = linq_ir::compile(&source, &catalog, &linq_ir::CompileOptions::default());
    }
});
