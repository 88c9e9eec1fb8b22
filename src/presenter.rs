use std::fmt::Display;
use std::io::Write;

use crate::error::Result;
use crate::matrix::Matrix;

const RULE: &str = "----------------------";

/// Renders a matrix for a human to look at.
pub trait Presenter {
    fn present<T: Copy + Display>(&mut self, title: &str, matrix: &Matrix<T>) -> Result<()>;
}

/// Writes a titled, ruled block with one `[a b c ...]` line per row.
pub struct TextPresenter<W: Write> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        TextPresenter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn present<T: Copy + Display>(&mut self, title: &str, matrix: &Matrix<T>) -> Result<()> {
        writeln!(self.out, "{title}")?;
        writeln!(self.out, "{RULE}")?;

        for row in matrix.iter_rows() {
            let line = row
                .iter()
                .map(T::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(self.out, "[{line}]")?;
        }

        writeln!(self.out, "{RULE}")?;
        self.out.flush()?;

        Ok(())
    }
}
