use super::*;

/// The output table. Rows stay in memory until [`Sheet::save`], which writes
/// the file once; a sheet dropped without saving saves itself.
#[derive(Debug)]
pub(crate) struct Sheet {
  path: PathBuf,
  rows: Vec<Comment>,
  saved: bool,
}

impl Sheet {
  const BYTE_ORDER_MARK: &[u8] = b"\xEF\xBB\xBF";

  const HEADER: [&str; 5] = ["用户名", "性别", "内容", "时间", "评论级别"];

  pub(crate) fn new(path: PathBuf) -> Self {
    Self {
      path,
      rows: Vec::new(),
      saved: false,
    }
  }

  pub(crate) fn path(&self) -> &Path {
    &self.path
  }

  pub(crate) fn push(&mut self, comment: Comment) {
    self.rows.push(comment);
  }

  pub(crate) fn rows(&self) -> &[Comment] {
    &self.rows
  }

  pub(crate) fn save(&mut self) -> Result {
    if self.saved {
      return Ok(());
    }

    self.saved = true;

    if let Err(error) = self.write() {
      error!(
        path = %self.path.display(),
        rows = self.rows.len(),
        "could not save sheet, collected comments were lost: {error:#}"
      );

      return Err(
        error.context(format!("could not write `{}`", self.path.display())),
      );
    }

    Ok(())
  }

  fn write(&self) -> Result {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }

    let mut file = File::create(&self.path)?;

    file.write_all(Self::BYTE_ORDER_MARK)?;

    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(Self::HEADER)?;

    for comment in &self.rows {
      writer.write_record(comment.record())?;
    }

    writer.flush()?;

    info!(
      path = %self.path.display(),
      rows = self.rows.len(),
      "saved comments"
    );

    Ok(())
  }
}

impl Drop for Sheet {
  fn drop(&mut self) {
    self.save().ok();
  }
}
