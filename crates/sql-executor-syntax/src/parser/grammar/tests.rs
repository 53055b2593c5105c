use std::fmt::Write;

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::lexer::lex;
use crate::parser::{Parser, SyntaxError};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};

fn parse(input: &str) -> (SyntaxNode, Vec<SyntaxError>) {
    let tokens = lex(input);
    Parser::new(&tokens, "GO").parse()
}

/// Node kinds, indented by depth. Nodes without child nodes show their text.
fn outline(input: &str) -> String {
    fn render(node: &SyntaxNode, depth: usize, out: &mut String) {
        for child in node.children() {
            let indent = "  ".repeat(depth);
            if child.first_child().is_none() {
                let text = child.text().to_string();
                writeln!(out, "{indent}{:?} {text:?}", child.kind()).unwrap();
            } else {
                writeln!(out, "{indent}{:?}", child.kind()).unwrap();
                render(&child, depth + 1, out);
            }
        }
    }

    let (tree, _) = parse(input);
    let mut out = String::new();
    render(&tree, 0, &mut out);
    out
}

fn outline_lines(input: &str) -> Vec<String> {
    outline(input).lines().map(str::to_string).collect()
}

/// Text of every top-level statement in the first batch.
fn statements(input: &str) -> Vec<String> {
    let (tree, _) = parse(input);
    let batch = tree.first_child().unwrap();
    assert_eq!(batch.kind(), SyntaxKind::BATCH);
    batch
        .children()
        .filter(|n| n.kind().is_statement())
        .map(|n| n.text().to_string())
        .collect()
}

fn errors(input: &str) -> Vec<String> {
    parse(input).1.into_iter().map(|e| e.message).collect()
}

#[test]
fn statements_end_at_next_keyword_or_semicolon() {
    assert_eq!(
        outline_lines("SELECT 1\nSELECT 2;\nPRINT 'x'"),
        vec![
            "BATCH",
            "  STATEMENT \"SELECT 1\"",
            "  STATEMENT \"SELECT 2;\"",
            "  STATEMENT \"PRINT 'x'\"",
        ]
    );
}

#[test]
fn separators_split_batches() {
    assert_eq!(
        outline_lines("SELECT 1\nGO\nSELECT 2\nGO 2\n"),
        vec![
            "BATCH",
            "  STATEMENT \"SELECT 1\"",
            "SEPARATOR \"GO\"",
            "BATCH",
            "  STATEMENT \"SELECT 2\"",
            "SEPARATOR \"GO 2\"",
            "BATCH \"\"",
        ]
    );
}

#[test]
fn if_with_block_and_else() {
    let input = "IF @x = 1\nBEGIN\n    PRINT 'a'\nEND\nELSE\n    PRINT 'b'\n";
    assert_eq!(
        outline_lines(input),
        vec![
            "BATCH",
            "  IF_STMT",
            "    CONDITION \"@x = 1\"",
            "    BLOCK",
            "      STATEMENT \"PRINT 'a'\"",
            "    ELSE_CLAUSE",
            "      STATEMENT \"PRINT 'b'\"",
        ]
    );
    assert!(errors(input).is_empty());
}

#[test]
fn try_catch_is_one_block() {
    let input = "BEGIN TRY\n  SELECT 1/0;\nEND TRY\nBEGIN CATCH\n  PRINT ERROR_MESSAGE();\nEND CATCH;\n";
    insta::assert_snapshot!(outline(input), @r#"
    BATCH
      TRY_CATCH
        STATEMENT "SELECT 1/0;"
        STATEMENT "PRINT ERROR_MESSAGE();"
    "#);
    assert!(errors(input).is_empty());
}

#[test]
fn while_loop_body_is_one_statement() {
    assert_eq!(
        outline_lines("WHILE @i < 10\n    SET @i = @i + 1\nPRINT @i"),
        vec![
            "BATCH",
            "  WHILE_STMT",
            "    CONDITION \"@i < 10\"",
            "    STATEMENT \"SET @i = @i + 1\"",
            "  STATEMENT \"PRINT @i\"",
        ]
    );
}

#[test]
fn nested_blocks_keep_their_ends() {
    let input = "BEGIN\n  IF @a = 1\n  BEGIN\n    PRINT 1;\n  END;\n  PRINT 2\nEND\nPRINT 3";
    assert_eq!(
        outline_lines(input),
        vec![
            "BATCH",
            "  BLOCK",
            "    IF_STMT",
            "      CONDITION \"@a = 1\"",
            "      BLOCK",
            "        STATEMENT \"PRINT 1;\"",
            "    STATEMENT \"PRINT 2\"",
            "  STATEMENT \"PRINT 3\"",
        ]
    );
    let (tree, _) = parse(input);
    let outer = tree.first_child().unwrap().first_child().unwrap();
    assert_eq!(
        outer.text().to_string(),
        "BEGIN\n  IF @a = 1\n  BEGIN\n    PRINT 1;\n  END;\n  PRINT 2\nEND"
    );
}

#[test]
fn condition_with_subquery_and_case() {
    assert_eq!(
        outline_lines(
            "IF EXISTS (SELECT 1 FROM t WHERE a = CASE WHEN b = 1 THEN 2 ELSE 3 END) RETURN",
        ),
        vec![
            "BATCH",
            "  IF_STMT",
            "    CONDITION \"EXISTS (SELECT 1 FROM t WHERE a = CASE WHEN b = 1 THEN 2 ELSE 3 END)\"",
            "    STATEMENT \"RETURN\"",
        ]
    );
}

#[test]
fn update_function_in_trigger_condition() {
    assert_eq!(
        outline_lines("IF UPDATE(price) PRINT 'changed'"),
        vec![
            "BATCH",
            "  IF_STMT",
            "    CONDITION \"UPDATE(price)\"",
            "    STATEMENT \"PRINT 'changed'\"",
        ]
    );
}

#[test]
fn empty_statements_have_no_node() {
    assert_eq!(
        outline_lines(";;\nSELECT 1"),
        vec!["BATCH", "  STATEMENT \"SELECT 1\""]
    );
}

#[test]
fn comments_do_not_end_statements() {
    assert_eq!(
        statements("SELECT a -- SELECT b\n  /* ; END */ FROM t\nPRINT 1"),
        vec!["SELECT a -- SELECT b\n  /* ; END */ FROM t", "PRINT 1"]
    );
}

#[rstest]
#[case::insert_select("INSERT INTO t (a)\nSELECT a FROM s")]
#[case::insert_exec("INSERT INTO t\nEXEC p")]
#[case::union_all("SELECT 1\nUNION ALL\nSELECT 2")]
#[case::cte_select("WITH c AS (SELECT 1 AS x)\nSELECT x FROM c")]
#[case::cte_update("WITH c (x) AS (SELECT 1)\nUPDATE t SET a = 1")]
#[case::update_set("UPDATE t\nSET a = 1\nWHERE b = 2")]
#[case::update_join("UPDATE t SET a = 1 FROM t JOIN u ON t.id = u.id")]
#[case::cursor("DECLARE c CURSOR FOR\nSELECT a FROM t")]
#[case::grant("GRANT SELECT, INSERT ON t TO u")]
#[case::drop_if_exists("DROP TABLE IF EXISTS t")]
#[case::alter_column("ALTER TABLE t ALTER COLUMN a INT")]
#[case::alter_database("ALTER DATABASE db SET RECOVERY SIMPLE")]
#[case::foreign_key(
    "ALTER TABLE t ADD CONSTRAINT fk FOREIGN KEY (a) REFERENCES u (a) ON DELETE CASCADE"
)]
#[case::offset_fetch("SELECT * FROM t ORDER BY a OFFSET 5 ROWS FETCH NEXT 5 ROWS ONLY")]
#[case::subquery("SELECT (SELECT MAX(a) FROM t) AS m")]
#[case::case_expression("SELECT CASE WHEN a = 1 THEN 'x' ELSE 'y' END FROM t")]
#[case::table_hint("SELECT a FROM t WITH (NOLOCK)")]
#[case::bulk_insert("BULK INSERT t FROM 'f.csv'")]
#[case::keyword_columns("SELECT t.open, t.close FROM t")]
#[case::begin_transaction("BEGIN TRANSACTION")]
#[case::merge(
    "MERGE t USING s ON t.a = s.a\nWHEN MATCHED THEN UPDATE SET t.b = s.b\nWHEN NOT MATCHED THEN INSERT (a) VALUES (s.a);"
)]
#[case::procedure("CREATE PROCEDURE p AS\nBEGIN\n  SELECT 1;\n  SELECT 2;\nEND")]
#[case::create_or_alter_view(
    "CREATE OR ALTER VIEW v AS\nSELECT a FROM t\nUNION\nSELECT b FROM u"
)]
fn single_statement(#[case] input: &str) {
    assert_eq!(statements(input), vec![input]);
    assert_eq!(errors(input), Vec::<String>::new());
}

#[rstest]
#[case::no_semicolons("SELECT 1 SELECT 2", &["SELECT 1", "SELECT 2"])]
#[case::semicolons("SELECT 1; SELECT 2;", &["SELECT 1;", "SELECT 2;"])]
#[case::values_then_select(
    "INSERT INTO t VALUES (1)\nSELECT 1",
    &["INSERT INTO t VALUES (1)", "SELECT 1"]
)]
#[case::update_then_set("UPDATE t SET a = 1\nSET @x = 2", &["UPDATE t SET a = 1", "SET @x = 2"])]
#[case::two_alters(
    "ALTER TABLE t ADD c INT\nALTER TABLE u ADD d INT",
    &["ALTER TABLE t ADD c INT", "ALTER TABLE u ADD d INT"]
)]
#[case::alter_then_set(
    "ALTER TABLE t ADD c INT\nSET NOCOUNT ON",
    &["ALTER TABLE t ADD c INT", "SET NOCOUNT ON"]
)]
#[case::declare_set_select(
    "DECLARE @x INT\nSET @x = 1\nSELECT @x",
    &["DECLARE @x INT", "SET @x = 1", "SELECT @x"]
)]
#[case::merge_then_select(
    "MERGE t USING s ON 1 = 1 WHEN MATCHED THEN DELETE;\nSELECT 1",
    &["MERGE t USING s ON 1 = 1 WHEN MATCHED THEN DELETE;", "SELECT 1"]
)]
#[case::select_then_cte(
    "SELECT 1\nWITH c AS (SELECT 2) SELECT * FROM c",
    &["SELECT 1", "WITH c AS (SELECT 2) SELECT * FROM c"]
)]
#[case::create_table_then_insert(
    "CREATE TABLE t (a INT)\nINSERT INTO t VALUES (1)",
    &["CREATE TABLE t (a INT)", "INSERT INTO t VALUES (1)"]
)]
#[case::transactions(
    "COMMIT\nBEGIN TRAN\nSAVE TRAN s",
    &["COMMIT", "BEGIN TRAN", "SAVE TRAN s"]
)]
fn statement_boundaries(#[case] input: &str, #[case] expected: &[&str]) {
    assert_eq!(statements(input), expected);
}

#[rstest]
#[case::unclosed_begin("BEGIN\n  SELECT 1", &["BEGIN without matching END"])]
#[case::stray_end("SELECT 1\nEND", &["END without matching BEGIN"])]
#[case::stray_else("ELSE PRINT 1", &["ELSE without matching IF"])]
#[case::missing_paren("SELECT (1", &["unbalanced parentheses: missing ')'"])]
#[case::extra_paren("SELECT 1)", &["unbalanced parentheses: unexpected ')'"])]
#[case::if_without_statement("IF @x = 1", &["IF without a statement"])]
#[case::if_without_condition("IF PRINT 1", &["IF without a condition"])]
#[case::bare_while("WHILE", &["WHILE without a condition", "WHILE without a statement"])]
#[case::else_without_statement("IF 1 = 1 PRINT 1 ELSE", &["ELSE without a statement"])]
#[case::try_without_catch(
    "BEGIN TRY SELECT 1 END TRY",
    &["END TRY must be followed by BEGIN CATCH"]
)]
#[case::unclosed_try("BEGIN TRY SELECT 1", &["BEGIN TRY without matching END TRY"])]
#[case::catch_without_try("BEGIN CATCH PRINT 1 END CATCH", &["BEGIN CATCH without BEGIN TRY"])]
#[case::block_split_by_separator(
    "BEGIN\nSELECT 1\nGO\nEND",
    &["BEGIN without matching END", "END without matching BEGIN"]
)]
fn structural_errors(#[case] input: &str, #[case] expected: &[&str]) {
    assert_eq!(errors(input), expected);
}

#[test]
fn errors_point_at_the_opening_keyword() {
    let (_, errors) = parse("SELECT 1\nBEGIN\nPRINT 2");
    assert_eq!(
        errors,
        vec![SyntaxError::new("BEGIN without matching END", 9)]
    );
}

#[test]
fn stray_tokens_become_error_nodes() {
    assert_eq!(
        outline_lines("ELSE PRINT 1"),
        vec!["BATCH", "  ERROR \"ELSE\"", "  STATEMENT \"PRINT 1\""]
    );
}

#[test]
fn tree_covers_every_byte() {
    let input = "/* head */\nIF (1 = 1\nBEGIN TRY\n END\nGO 2\n\nELSE )) 'open";
    let (tree, _) = parse(input);
    assert_eq!(tree.text().to_string(), input);
}

#[test]
fn separator_behind_comment_stays_in_the_batch() {
    let (tree, errors) = parse("SELECT 1 /* a\n*/ GO\nSELECT 2");
    let batches = tree
        .children()
        .filter(|n| n.kind() == SyntaxKind::BATCH)
        .count();

    assert_eq!(batches, 1);
    assert!(errors.is_empty());
}
