//! Whole-pipeline scenarios: compile, inspect bounds, execute.

use linq_eval::execute;
use linq_ir::{compile, CompileError, CompileOptions};
use linq_lang::{Catalog, Interval, Kind, Value};
use linq_soundness::compile_str;

#[test]
fn single_scalar_input() {
    let program = compile_str("a <- int", 512, 10).unwrap();
    assert_eq!(program.input_bounds, Some(vec![Interval::new(-512, 512)]));
    assert_eq!(program.output_kind(), Kind::Int);
    assert_eq!(execute(&program, &[Value::Int(17)]).unwrap(), Value::Int(17));
}

#[test]
fn take_prefix_of_list() {
    let program = compile_str("a <- [int]\nb <- int\nc <- TAKE b a", 512, 10).unwrap();
    assert_eq!(program.registers[2].kind, Kind::List);
    let out = execute(&program, &[Value::List(vec![1, 2, 3, 4, 5]), Value::Int(3)]).unwrap();
    assert_eq!(out, Value::List(vec![1, 2, 3]));
    assert_eq!(
        program.input_bounds,
        Some(vec![Interval::symmetric(512), Interval::new(0, 10)])
    );
}

#[test]
fn count_of_even_elements() {
    let program = compile_str("a <- [int]\nb <- COUNT isEVEN a", 512, 10).unwrap();
    assert_eq!(program.output_kind(), Kind::Int);
    assert_eq!(
        program.register_bounds,
        Some(vec![Interval::symmetric(512), Interval::symmetric(512)])
    );
    let cases: [(&[i64], i64); 4] = [
        (&[], 0),
        (&[1, 3, 5], 0),
        (&[2, -4, 7, 0], 3),
        (&[-512, 511, 512, -1], 2),
    ];
    for (xs, expected) in cases {
        let out = execute(&program, &[Value::List(xs.to_vec())]).unwrap();
        assert_eq!(out, Value::Int(expected), "{:?}", xs);
    }
}

#[test]
fn access_out_of_range_reads_the_value_bound() {
    for v in [64, 512] {
        let program = compile_str("a <- int | b <- [int] | c <- ACCESS a b", v, 10).unwrap();
        for index in [-1, 3, 10, 1000] {
            let out = execute(&program, &[Value::Int(index), Value::List(vec![4, 5, 6])]).unwrap();
            assert_eq!(out, Value::Int(v), "index {}", index);
        }
        let out = execute(&program, &[Value::Int(1), Value::List(vec![4, 5, 6])]).unwrap();
        assert_eq!(out, Value::Int(5));
    }
}

#[test]
fn usage_text_program() {
    let program = compile_str(
        "a <- [int] | b <- int | c <- TAKE b a | d <- COUNT isEVEN c | e <- TAKE d a",
        512,
        10,
    )
    .unwrap();
    assert_eq!(program.pipe_form(), "a <- [int] | b <- int | c <- TAKE b a | d <- COUNT isEVEN c | e <- TAKE d a");
    let out = execute(&program, &[Value::List(vec![6, 1, 8, 3, 2]), Value::Int(4)]).unwrap();
    assert_eq!(out, Value::List(vec![6, 1]));
}

#[test]
fn compiling_twice_is_identical() {
    let catalog = Catalog::new(512);
    let options = CompileOptions::with_list_len(10);
    let source = "a <- [int]\nb <- [int]\nc <- ZIPWITH - a b\nd <- MAP SQR c\ne <- SUM d";
    let first = compile(source, &catalog, &options).unwrap();
    let second = compile(source, &catalog, &options).unwrap();
    assert_eq!(first, second);

    let inputs = [Value::List(vec![1, 2, 3]), Value::List(vec![3, 2, 1])];
    assert_eq!(
        execute(&first, &inputs).unwrap(),
        execute(&second, &inputs).unwrap()
    );
    assert_eq!(execute(&first, &inputs).unwrap(), Value::Int(8));
}

#[test]
fn canonical_form_recompiles_to_the_same_bounds() {
    let source = "[int]\nint\nDROP b a\nMAP MUL3 c\nSCANL1 MIN d";
    let program = compile_str(source, 512, 10).unwrap();
    let again = compile_str(&program.pipe_form(), 512, 10).unwrap();
    assert_eq!(program.input_bounds, again.input_bounds);
    assert_eq!(program.registers, again.registers);
}

#[test]
fn collapsing_chain_is_rejected() {
    let source = "a <- [int] | b <- MAP MUL4 a | c <- MAP MUL4 b | d <- MAP MUL4 c | e <- MAP MUL4 d | f <- MAP MUL4 e";
    let err = compile(
        &linq_ir::pipe_to_lines(source),
        &Catalog::new(512),
        &CompileOptions::with_list_len(10),
    )
    .unwrap_err();
    assert!(err.is_rejection());
    assert!(matches!(err, CompileError::NoValidInputs(_)));
}

#[test]
fn threshold_rejects_otherwise_valid_programs() {
    let source = linq_ir::pipe_to_lines("a <- [int] | b <- SCANL1 * a");
    let catalog = Catalog::new(512);
    let loose = CompileOptions::with_list_len(10);
    let program = compile(&source, &catalog, &loose).unwrap();
    assert_eq!(program.input_bounds, Some(vec![Interval::new(-1, 1)]));

    let strict = CompileOptions {
        min_input_range: 2,
        ..loose
    };
    assert!(compile(&source, &catalog, &strict).unwrap_err().is_rejection());
}
