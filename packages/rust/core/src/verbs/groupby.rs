//! `groupby`: partition a table by the values of one column.

use crate::args::Args;
use crate::registrar::{PipeVerb, singledispatch_pipeverb};
use crate::table::Table;

/// Build the `groupby` verb: `Table` + `by` (arg 0) → `GroupedTable`.
pub fn groupby() -> PipeVerb {
    let verb = singledispatch_pipeverb("groupby");
    verb.register(|table: Table, args: &Args| {
        args.bind(&["by"])?;
        let by: String = args.require("by", 0)?;
        table.group_by(&by)
    });
    verb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::Datum;
    use crate::table::GroupedTable;
    use serde_json::json;

    fn table() -> Table {
        Table::new(
            vec!["k".into(), "v".into()],
            vec![vec![json!(2), json!(1)], vec![json!(1), json!(2)]],
        )
        .expect("table")
    }

    #[test]
    fn groups_by_named_column() {
        let out = groupby()
            .invoke(Datum::new(table()), &Args::new().arg("k"))
            .expect("groupby")
            .downcast::<GroupedTable>()
            .expect("grouped");
        assert_eq!(out.key(), "k");
        assert_eq!(out.keys().cloned().collect::<Vec<_>>(), vec![json!(1), json!(2)]);
    }

    #[test]
    fn missing_or_unknown_column() {
        let err = groupby().invoke(Datum::new(table()), &Args::new()).unwrap_err();
        assert!(err.to_string().contains("missing required argument 'by'"));

        let err = groupby()
            .invoke(Datum::new(table()), &Args::new().kwarg("by", "nope"))
            .unwrap_err();
        assert_eq!(err.to_string(), "validation error: no column named 'nope'");
    }

    #[test]
    fn unknown_keyword_is_rejected() {
        let err = groupby()
            .invoke(Datum::new(table()), &Args::new().kwarg("column", "k"))
            .unwrap_err();
        assert_eq!(err.to_string(), "argument error: unexpected keyword argument 'column'");

        let err = groupby()
            .invoke(Datum::new(table()), &Args::new().arg("k").arg("v"))
            .unwrap_err();
        assert!(err.to_string().contains("at most 1 positional"));
    }

    #[test]
    fn sequences_are_unimplemented() {
        let err = groupby()
            .invoke(Datum::new(vec![1i64]), &Args::new().arg("k"))
            .unwrap_err();
        assert_eq!(err.to_string(), "groupby is not implemented for data of type Vec<i64>");
    }
}
