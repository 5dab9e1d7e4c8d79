//! Markdown export functionality

use crate::error::Result;
use crate::sheet::Sheet;
use sheets_formula::formula::CellAddress;
use std::io::Write;
use std::path::Path;

/// Write the whole grid as a markdown table of visible values.
pub fn write_markdown<W: Write>(out: &mut W, sheet: &mut Sheet) -> std::io::Result<()> {
    let (rows, columns) = (sheet.row_count(), sheet.column_count());

    // Header with column letters
    write!(out, "|   |")?;
    for col in 0..columns {
        write!(out, " {} |", CellAddress::col_to_letters(col))?;
    }
    writeln!(out)?;

    write!(out, "|---|")?;
    for _ in 0..columns {
        write!(out, "---|")?;
    }
    writeln!(out)?;

    for row in 0..rows {
        write!(out, "| {} |", row + 1)?; // 1-based row numbers
        for col in 0..columns {
            let display = sheet.get_visible_value(CellAddress::new(row, col));
            write!(out, " {} |", escape_markdown(&display))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Write the grid to a markdown file.
pub fn write_markdown_file(path: &Path, sheet: &mut Sheet) -> Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_markdown(&mut file, sheet)?;
    file.flush()?;
    Ok(())
}

fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(sheet: &mut Sheet) -> String {
        let mut out = Vec::new();
        write_markdown(&mut out, sheet).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_markdown_table_of_visible_values() {
        let mut sheet = Sheet::new(2, 2);
        sheet.set_value(CellAddress::new(0, 0), "=1/4").unwrap();
        sheet.set_value(CellAddress::new(1, 1), "=A1*2").unwrap();

        let expected = "\
|   | A | B |
|---|---|---|
| 1 | 0.25 |  |
| 2 |  | 0.5 |
";
        assert_eq!(render(&mut sheet), expected);
    }

    #[test]
    fn test_markdown_escapes_pipes_and_newlines() {
        let mut sheet = Sheet::new(2, 2);
        sheet.set_value(CellAddress::new(0, 1), "a|b").unwrap();
        sheet.set_value(CellAddress::new(1, 0), "=\"x\ny\"").unwrap();
        let text = render(&mut sheet);
        assert!(text.contains(" a\\|b |"));
        assert!(text.contains(" x y |"));
    }

    #[test]
    fn test_markdown_file() {
        let path = std::env::temp_dir().join(format!(
            "sheets_md_export_{}_{:?}.md",
            std::process::id(),
            std::thread::current().id()
        ));
        let mut sheet = Sheet::default();
        sheet.set_value(CellAddress::new(7, 2), "last").unwrap();
        write_markdown_file(&path, &mut sheet).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(text.lines().count(), 10);
        assert!(text.lines().last().unwrap().ends_with(" last |"));
    }
}
