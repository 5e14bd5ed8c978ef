//! 交互菜单：把用户的选择翻译成对文件系统的调用。

use std::io::{self, BufRead, Write};

use chain_fs::{BackingStore, ChainFileSystem};

/// 读取时最多取回的字节数
const READ_CAP: usize = 1000;

const HELP: &str = "\
Usage:
  1  Open a file, creating it when missing: <file name>
  2  Write data to a file: <file name> <data>
  3  Read a file from its start: <file name>
  4  Delete one of the existing files
  5  List the existing files
  6  Show this help
  7  Quit and delete the partition";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Open,
    Write,
    Read,
    Delete,
    List,
    Help,
    Quit,
}

impl Choice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Open),
            "2" => Some(Self::Write),
            "3" => Some(Self::Read),
            "4" => Some(Self::Delete),
            "5" => Some(Self::List),
            "6" => Some(Self::Help),
            "7" => Some(Self::Quit),
            _ => None,
        }
    }
}

pub struct Shell<S: BackingStore, R, W> {
    fs: ChainFileSystem<S>,
    input: R,
    output: W,
}

impl<S: BackingStore, R: BufRead, W: Write> Shell<S, R, W> {
    pub fn new(fs: ChainFileSystem<S>, input: R, output: W) -> Self {
        Self { fs, input, output }
    }

    /// 循环处理菜单，直到用户退出或输入结束，最后删除分区。
    pub fn run(mut self) -> io::Result<()> {
        loop {
            self.menu()?;
            let Some(line) = self.prompt("Your choice: ")? else {
                break;
            };

            let keep_going = match Choice::parse(&line) {
                Some(Choice::Quit) => false,
                Some(choice) => self.dispatch(choice)?,
                None => {
                    writeln!(self.output, "Invalid choice, try again.")?;
                    true
                }
            };
            if !keep_going {
                break;
            }
        }

        writeln!(self.output, "Bye!")?;
        let Self { fs, mut output, .. } = self;
        if let Err(e) = fs.delete_partition() {
            writeln!(output, "Error deleting the partition: {e}")?;
        }

        Ok(())
    }

    /// 返回`false`表示输入已经结束
    fn dispatch(&mut self, choice: Choice) -> io::Result<bool> {
        match choice {
            Choice::Open => self.open(),
            Choice::Write => self.write(),
            Choice::Read => self.read(),
            Choice::Delete => self.delete(),
            Choice::List => self.list().map(|_| true),
            Choice::Help => writeln!(self.output, "{HELP}").map(|_| true),
            Choice::Quit => Ok(false),
        }
    }

    fn menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Menu:")?;
        writeln!(self.output, "1. Open a file")?;
        writeln!(self.output, "2. Write to a file")?;
        writeln!(self.output, "3. Read from a file")?;
        writeln!(self.output, "4. Delete a file")?;
        writeln!(self.output, "5. List files")?;
        writeln!(self.output, "6. Help")?;
        writeln!(self.output, "7. Quit")
    }

    fn open(&mut self) -> io::Result<bool> {
        let Some(name) = self.prompt("File name to open: ")? else {
            return Ok(false);
        };

        match self.fs.open(&name) {
            Ok(_) => writeln!(self.output, "File '{name}' opened.")?,
            Err(e) => writeln!(self.output, "Error opening '{name}': {e}")?,
        }
        Ok(true)
    }

    fn write(&mut self) -> io::Result<bool> {
        let Some(name) = self.prompt("File name: ")? else {
            return Ok(false);
        };
        let Some(data) = self.prompt("Data to write: ")? else {
            return Ok(false);
        };

        let result = self
            .fs
            .open(&name)
            .and_then(|handle| self.fs.write(&handle, data.as_bytes()));
        match result {
            Ok(n) => writeln!(self.output, "Bytes written: {n}")?,
            Err(e) => writeln!(self.output, "Error writing to '{name}': {e}")?,
        }
        Ok(true)
    }

    fn read(&mut self) -> io::Result<bool> {
        let Some(name) = self.prompt("File name: ")? else {
            return Ok(false);
        };

        let mut buf = [0u8; READ_CAP];
        let result = self
            .fs
            .open(&name)
            .and_then(|handle| self.fs.read(&handle, &mut buf));
        match result {
            Ok(n) => {
                writeln!(self.output, "Data read from '{name}':")?;
                writeln!(self.output, "{}", String::from_utf8_lossy(&buf[..n]))?;
                writeln!(self.output, "Bytes read: {n}")?;
            }
            Err(e) => writeln!(self.output, "Error reading '{name}': {e}")?,
        }
        Ok(true)
    }

    fn delete(&mut self) -> io::Result<bool> {
        let names: Vec<String> = self.fs.list_files().map(str::to_owned).collect();
        if names.is_empty() {
            writeln!(self.output, "No files.")?;
            return Ok(true);
        }

        writeln!(self.output, "Files:")?;
        for (i, name) in names.iter().enumerate() {
            writeln!(self.output, "{}. {name}", i + 1)?;
        }

        let Some(line) = self.prompt("Number of the file to delete: ")? else {
            return Ok(false);
        };
        let Some(name) = line
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| names.get(i))
        else {
            writeln!(self.output, "Invalid file number.")?;
            return Ok(true);
        };

        match self.fs.delete_file(name) {
            Ok(()) => writeln!(self.output, "File '{name}' deleted.")?,
            Err(e) => writeln!(self.output, "Error deleting '{name}': {e}")?,
        }
        Ok(true)
    }

    fn list(&mut self) -> io::Result<()> {
        writeln!(self.output, "Files:")?;
        for name in self.fs.list_files() {
            writeln!(self.output, "{name}")?;
        }
        Ok(())
    }

    /// 输出提示并读取一行，输入结束时返回空
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }
}
