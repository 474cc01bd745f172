//! `append_col`: add one more element (sequences) or column (tables).

use serde_json::{Value, json};

use crate::args::Args;
use crate::registrar::{PipeVerb, singledispatch_pipeverb};
use crate::table::Table;

/// Default column name when `append_col` is applied to a table.
const DEFAULT_COLUMN: &str = "new_col";

const SEQUENCE_PARAMS: &[&str] = &["x"];
const TABLE_PARAMS: &[&str] = &["x", "name"];

/// Build the `append_col` verb.
///
/// | input | result |
/// |---|---|
/// | `Vec<i64>` | input with `x` (default `1`) appended |
/// | `Vec<f64>` | input with `x` (default `1.0`) appended |
/// | `Vec<String>` | input with `x` (required) appended |
/// | `Table` | input with column `name` (default `new_col`) filled with `x` (default `1`) |
pub fn append_col() -> PipeVerb {
    let verb = singledispatch_pipeverb("append_col");

    verb.register(|mut v: Vec<i64>, args: &Args| {
        args.bind(SEQUENCE_PARAMS)?;
        v.push(args.get_or("x", 0, 1)?);
        Ok(v)
    })
    .register(|mut v: Vec<f64>, args: &Args| {
        args.bind(SEQUENCE_PARAMS)?;
        v.push(args.get_or("x", 0, 1.0)?);
        Ok(v)
    })
    .register(|mut v: Vec<String>, args: &Args| {
        args.bind(SEQUENCE_PARAMS)?;
        v.push(args.require("x", 0)?);
        Ok(v)
    })
    .register(|table: Table, args: &Args| {
        args.bind(TABLE_PARAMS)?;
        let x: Value = args.get_or("x", 0, json!(1))?;
        let name: String = args.get_or("name", 1, DEFAULT_COLUMN.to_string())?;
        let n = table.num_rows();
        table.with_column(name, vec![x; n])
    });

    verb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::Datum;
    use crate::source::PipeSources;

    fn sources() -> PipeSources {
        let sources = PipeSources::new();
        sources.enable::<Vec<i64>>();
        sources.enable::<Vec<f64>>();
        sources.enable::<Vec<String>>();
        sources.enable::<Table>();
        sources.enable::<i64>();
        sources
    }

    #[test]
    fn appends_default_to_int_sequence() {
        let sources = sources();
        let out = (sources.source(vec![1i64, 2]) | append_col().step())
            .finish_as::<Vec<i64>>()
            .expect("append");
        assert_eq!(out, vec![1, 2, 1]);
    }

    #[test]
    fn appends_named_x() {
        let sources = sources();
        let out = (sources.source(vec![1i64, 2]) | append_col().call(Args::new().kwarg("x", 5)))
            .finish_as::<Vec<i64>>()
            .expect("append");
        assert_eq!(out, vec![1, 2, 5]);

        let out = (sources.source(vec![0.5f64]) | append_col().step())
            .finish_as::<Vec<f64>>()
            .expect("append");
        assert_eq!(out, vec![0.5, 1.0]);
    }

    #[test]
    fn string_sequence_requires_x() {
        let sources = sources();
        let err = (sources.source(vec!["a".to_string()]) | append_col().step())
            .finish()
            .unwrap_err();
        assert!(err.to_string().contains("missing required argument 'x'"));

        let out = (sources.source(vec!["a".to_string()]) | append_col().call(Args::new().arg("b")))
            .finish_as::<Vec<String>>()
            .expect("append");
        assert_eq!(out, vec!["a", "b"]);
    }

    #[test]
    fn appends_table_column() {
        let sources = sources();
        let table = Table::new(vec!["a".into()], vec![vec![json!(1)], vec![json!(2)]]).expect("table");
        let out = (sources.source(table) | append_col().call(Args::new().arg("z").arg("flag")))
            .finish_as::<Table>()
            .expect("append");
        assert_eq!(out.columns(), &["a", "flag"]);
        assert_eq!(out.rows()[1], vec![json!(2), json!("z")]);
    }

    #[test]
    fn integer_input_is_unimplemented() {
        let sources = sources();
        let err = (sources.source(1i64) | append_col().step()).finish().unwrap_err();
        assert_eq!(err.to_string(), "append_col is not implemented for data of type i64");
    }

    #[test]
    fn misspelled_keyword_is_an_error() {
        let err = append_col()
            .invoke(Datum::new(vec![1i64, 2]), &Args::new().kwarg("y", 5))
            .unwrap_err();
        assert_eq!(err.to_string(), "argument error: unexpected keyword argument 'y'");
    }

    #[test]
    fn too_many_positionals_is_an_error() {
        let args = Args::new().arg(5).arg(6).arg(7);
        let err = append_col()
            .invoke(Datum::new(vec![1i64, 2]), &args)
            .unwrap_err();
        assert!(matches!(err, pipeverb_shared::PipeVerbError::Argument { .. }));

        let table = Table::new(vec!["a".into()], vec![vec![json!(1)]]).expect("table");
        let err = append_col().invoke(Datum::new(table), &args).unwrap_err();
        assert!(err.to_string().contains("at most 2 positional"));
    }

    #[test]
    fn value_given_twice_is_an_error() {
        let err = append_col()
            .invoke(Datum::new(vec![1i64, 2]), &Args::new().arg(5).kwarg("x", 6))
            .unwrap_err();
        assert_eq!(err.to_string(), "argument error: got multiple values for argument 'x'");
    }

    #[test]
    fn pipe_equals_direct_invocation() {
        let verb = append_col();
        let args = Args::new().kwarg("x", 9);
        let direct = verb
            .invoke(Datum::new(vec![3i64]), &args)
            .expect("invoke")
            .downcast::<Vec<i64>>()
            .expect("vec");
        let piped = (sources().source(vec![3i64]) | verb.call(args))
            .finish_as::<Vec<i64>>()
            .expect("pipe");
        assert_eq!(direct, piped);
    }
}
