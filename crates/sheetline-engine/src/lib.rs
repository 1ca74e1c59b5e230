//! sheetline_engine - Spreadsheet engine + aggregate formula evaluation.

pub(crate) mod builtins;
pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;

    fn workbook_with_pair(a: &str, b: &str) -> Workbook {
        let mut wb = Workbook::new();
        wb.set_cell_value(0, 0, Some(a));
        wb.set_cell_value(0, 1, Some(b));
        wb
    }

    fn eval(wb: &Workbook, body: &str) -> FormulaValue {
        FormulaEvaluator::new().evaluate(body, 10, 10, wb)
    }

    /// Minimal fixture exposing sheets without a full workbook.
    struct Fixture {
        sheets: Vec<Sheet>,
    }

    impl WorkbookAccess for Fixture {
        fn current_sheet(&self) -> Option<&Sheet> {
            self.sheets.first()
        }

        fn find_sheet(&self, name: &str) -> Option<&Sheet> {
            self.sheets.iter().find(|s| s.matches_name(name))
        }
    }

    #[test]
    fn test_numeric_text_sets_number() {
        let mut wb = Workbook::new();
        for (row, col, text, expected) in [
            (0, 0, "3", 3.0),
            (19, 19, "-2.5", -2.5),
            (4, 7, "1e3", 1000.0),
            (1, 1, " 42 ", 42.0),
        ] {
            assert!(wb.set_cell_value(row, col, Some(text)));
            let cell = wb.get_cell(row, col).unwrap();
            assert_eq!(cell.value(), CellValue::Number(expected));
            assert_eq!(cell.kind(), CellKind::Number);
            assert_eq!(cell.content(), text);
        }
    }

    #[test]
    fn test_non_numeric_text_sets_text() {
        let mut wb = Workbook::new();
        for text in ["hello", "12abc", "(1,1)", "sum((1,1),(1,2))"] {
            wb.set_cell_value(2, 3, Some(text));
            let cell = wb.get_cell(2, 3).unwrap();
            assert_eq!(cell.kind(), CellKind::Text);
            assert_eq!(cell.value(), CellValue::Text(text.to_string()));
        }
    }

    #[test]
    fn test_sum_cell_list() {
        let wb = workbook_with_pair("3", "4");
        assert_eq!(eval(&wb, "sum((1,1),(1,2))"), FormulaValue::Number(7.0));
    }

    #[test]
    fn test_mult_cell_list() {
        let wb = workbook_with_pair("3", "4");
        assert_eq!(eval(&wb, "mult((1,1),(1,2))"), FormulaValue::Number(12.0));
        assert_eq!(eval(&wb, "Multiplication((1,1),(1,2))"), FormulaValue::Number(12.0));
    }

    #[test]
    fn test_formula_cell_stores_result() {
        let mut wb = workbook_with_pair("3", "4");
        wb.set_cell_value(0, 2, Some("=SUM((1,1), (1,2))"));
        let cell = wb.get_cell(0, 2).unwrap();
        assert_eq!(cell.kind(), CellKind::Formula);
        assert_eq!(cell.formula(), "=SUM((1,1), (1,2))");
        assert_eq!(cell.value(), CellValue::Number(7.0));
    }

    #[test]
    fn test_cell_list_skips_non_numeric_and_out_of_bounds() {
        let mut wb = workbook_with_pair("3", "word");
        wb.set_cell_value(1, 0, Some("5"));
        assert_eq!(
            eval(&wb, "sum((1,1),(1,2),(2,1),(99,1),(0,1),(1,21))"),
            FormulaValue::Number(8.0)
        );
        assert_eq!(
            eval(&wb, "mult((1,1),(1,2),(3,3),(2,1))"),
            FormulaValue::Number(15.0)
        );
    }

    #[test]
    fn test_cell_list_reads_current_sheet() {
        let mut wb = workbook_with_pair("3", "4");
        wb.add_sheet("Other");
        wb.switch_to(1);
        wb.set_cell_value(0, 0, Some("100"));
        assert_eq!(eval(&wb, "sum((1,1),(1,2))"), FormulaValue::Number(100.0));
    }

    #[test]
    fn test_sum_range_on_named_sheet() {
        let mut wb = Workbook::new();
        wb.add_sheet("Sheet2");
        wb.switch_to(1);
        wb.set_cell_value(0, 0, Some("1"));
        wb.set_cell_value(0, 1, Some("2"));
        wb.set_cell_value(1, 0, Some("3"));
        wb.set_cell_value(1, 1, Some("4"));
        wb.switch_to(0);
        assert_eq!(eval(&wb, "sum(Sheet2,(1,1),(2,2))"), FormulaValue::Number(10.0));
        assert_eq!(eval(&wb, "mult(sheet2, (1,1), (2,2))"), FormulaValue::Number(24.0));
    }

    #[test]
    fn test_range_on_sheet_name_with_space() {
        let wb = workbook_with_pair("3", "4");
        assert_eq!(eval(&wb, "sum(Sheet 1,(1,1),(1,2))"), FormulaValue::Number(7.0));
    }

    #[test]
    fn test_missing_sheet_yields_identity() {
        let wb = workbook_with_pair("3", "4");
        assert_eq!(eval(&wb, "sum(Nope,(1,1),(2,2))"), FormulaValue::Number(0.0));
        assert_eq!(eval(&wb, "mult(Nope,(1,1),(2,2))"), FormulaValue::Number(1.0));
    }

    #[test]
    fn test_range_is_clamped_to_sheet_extent() {
        let mut wb = Workbook::with_layout("Small", 3, 3);
        wb.set_cell_value(2, 2, Some("5"));
        wb.set_cell_value(0, 0, Some("1"));
        assert_eq!(eval(&wb, "sum(Small,(1,1),(50,50))"), FormulaValue::Number(6.0));
        assert_eq!(eval(&wb, "sum(Small,(0,0),(3,3))"), FormulaValue::Number(6.0));
        assert_eq!(eval(&wb, "sum(Small,(3,3),(9,9))"), FormulaValue::Number(5.0));
    }

    #[test]
    fn test_reversed_range_folds_nothing() {
        let wb = workbook_with_pair("3", "4");
        assert_eq!(eval(&wb, "sum(Sheet 1,(1,2),(1,1))"), FormulaValue::Number(0.0));
    }

    #[test]
    fn test_malformed_arguments_yield_identity() {
        let wb = workbook_with_pair("3", "4");
        assert_eq!(eval(&wb, "sum((1,1))"), FormulaValue::Number(0.0));
        assert_eq!(eval(&wb, "mult(1,2)"), FormulaValue::Number(1.0));
        assert_eq!(eval(&wb, "sum((x,1),(1,2))"), FormulaValue::Number(0.0));
    }

    #[test]
    fn test_unrecognized_keyword_yields_token() {
        let mut wb = workbook_with_pair("3", "4");
        assert_eq!(
            eval(&wb, "avg((1,1),(1,2))"),
            FormulaValue::Error(ErrorToken::Unrecognized)
        );
        wb.set_cell_value(5, 5, Some("=avg((1,1),(1,2))"));
        let cell = wb.get_cell(5, 5).unwrap();
        assert_eq!(cell.value(), CellValue::Error(ErrorToken::Unrecognized));
        assert_eq!(cell.numeric_value(), None);
    }

    #[test]
    fn test_formula_results_feed_aggregates() {
        let mut wb = workbook_with_pair("3", "4");
        wb.set_cell_value(0, 2, Some("=sum((1,1),(1,2))"));
        wb.set_cell_value(0, 3, Some("=mult((1,3),(1,1))"));
        assert_eq!(wb.get_cell_value(0, 3), CellValue::Number(21.0));
    }

    #[test]
    fn test_error_cells_do_not_participate() {
        let mut wb = workbook_with_pair("3", "4");
        wb.set_cell_value(0, 2, Some("=bogus((1,1),(1,2))"));
        assert_eq!(eval(&wb, "sum((1,1),(1,3))"), FormulaValue::Number(3.0));
    }

    #[test]
    fn test_nan_and_inf_words_do_not_poison_aggregates() {
        let mut wb = workbook_with_pair("Nan", "inf");
        wb.set_cell_value(0, 2, Some("5"));
        assert_eq!(wb.get_cell(0, 0).unwrap().kind(), CellKind::Text);
        assert_eq!(wb.get_cell(0, 1).unwrap().kind(), CellKind::Text);
        assert_eq!(eval(&wb, "sum((1,1),(1,2),(1,3))"), FormulaValue::Number(5.0));
        assert_eq!(eval(&wb, "mult(Sheet 1,(1,1),(1,3))"), FormulaValue::Number(5.0));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let wb = workbook_with_pair("3", "4");
        let first = eval(&wb, "sum((1,1),(1,2))");
        let second = eval(&wb, "sum((1,1),(1,2))");
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_recalculation_on_edit() {
        let mut wb = workbook_with_pair("3", "4");
        wb.set_cell_value(0, 2, Some("=sum((1,1),(1,2))"));
        wb.set_cell_value(0, 0, Some("100"));
        wb.set_cell_value(9, 9, Some("unrelated"));
        assert_eq!(wb.get_cell_value(0, 2), CellValue::Number(7.0));
    }

    #[test]
    fn test_evaluator_accepts_fixture_context() {
        let mut data = Sheet::new("Data");
        for (col, text) in [(0, "2"), (1, "8")] {
            let cell = data.grid().build_cell(0, col, Some(text), None).unwrap();
            data.grid_mut().put(0, col, cell);
        }
        let fixture = Fixture { sheets: vec![data] };

        let evaluator = FormulaEvaluator::new();
        assert_eq!(
            evaluator.evaluate("sum((1,1),(1,2))", 0, 0, &fixture),
            FormulaValue::Number(10.0)
        );
        assert_eq!(
            evaluator.evaluate("mult(DATA,(1,1),(1,2))", 0, 0, &fixture),
            FormulaValue::Number(16.0)
        );
    }

    #[test]
    fn test_empty_context_yields_identity() {
        let fixture = Fixture { sheets: Vec::new() };
        assert_eq!(
            FormulaEvaluator::new().evaluate("mult((1,1),(1,2))", 0, 0, &fixture),
            FormulaValue::Number(1.0)
        );
    }
}
