#![no_main]
use libfuzzer_sys::fuzz_target;

// Any program that compiles must generate without a bound violation.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let catalog = linq_lang::Catalog::new(512);
        let source = linq_ir::pipe_to_lines(s);
        if let Ok(program) =
            linq_ir::compile(&source, &catalog, &linq_ir::CompileOptions::with_list_len(10))
        {
            let config = linq_eval::GenerateConfig {
                count: 8,
                seed: Some(data.len() as u64),
                ..linq_eval::GenerateConfig::default()
            };
            if let Err(e @ linq_eval::GenerateError::BoundViolation { .. }) =
                linq_eval::generate_examples(&program, &config)
            {
                panic!("{}: {}", program.pipe_form(), e);
            }
        }
    }
});
