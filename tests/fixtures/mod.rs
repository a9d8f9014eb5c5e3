//! Submission fixtures for integration tests.
//!
//! `Curriculum` lays out `module-NN-*/homework/starter/...` trees in a
//! temporary directory.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PROFILE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Jordan Lee</title>
  <link rel="stylesheet" href="styles.css">
</head>
<body>
  <header><h1>Jordan Lee</h1></header>
  <main>
    <h2>About Me</h2>
    <p>I build things for the web.</p>
    <p>I like climbing.</p>
    <p>I am learning Rust.</p>
    <img src="me.jpg" alt="Jordan smiling">
    <ul><li>HTML</li><li>CSS</li><li>Git</li></ul>
    <a href="https://github.com/jordan">GitHub</a>
  </main>
</body>
</html>"#;

pub const PROFILE_CSS: &str = r#"
body { font-family: Arial, sans-serif; margin: 0; }
h1 { color: #333; }
a { color: teal; }
"#;

pub const TODO_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<body>
  <form id="todo-form"><input id="todo-input"><button>Add</button></form>
  <div>
    <button class="filter-btn">All</button>
    <button class="filter-btn">Active</button>
    <button class="filter-btn">Completed</button>
  </div>
  <ul id="todo-list"></ul>
  <script src="script.js"></script>
</body>
</html>"#;

pub const TODO_JS: &str = r#"let todos = [];
const form = document.getElementById('todo-form');
form.addEventListener('submit', (event) => {
  event.preventDefault();
  const li = document.createElement('li');
  todos.push(li);
});
"#;

pub const MODULE_01: &str = "module-01-html";
pub const MODULE_03: &str = "module-03-javascript";
pub const MODULE_05: &str = "module-05-react";

/// A temporary curriculum root.
pub struct Curriculum {
    dir: TempDir,
}

impl Curriculum {
    pub fn new() -> Self {
        Curriculum {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn module_dir(&self, module: &str) -> PathBuf {
        self.root().join(module)
    }

    pub fn homework(&self, module: &str) -> PathBuf {
        let path = self.module_dir(module).join("homework");
        fs::create_dir_all(&path).expect("create homework dir");
        path
    }

    /// Write `content` to `<module>/homework/<relative>`.
    pub fn write(&self, module: &str, relative: &str, content: &str) -> PathBuf {
        let path = self.homework(module).join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture dir");
        }
        fs::write(&path, content).expect("write fixture");
        path
    }

    pub fn with_profile(self, html: &str) -> Self {
        self.write(MODULE_01, "starter/index.html", html);
        self.write(MODULE_01, "starter/styles.css", PROFILE_CSS);
        self
    }

    pub fn with_todo(self) -> Self {
        self.write(MODULE_03, "starter/index.html", TODO_HTML);
        self.write(MODULE_03, "starter/script.js", TODO_JS);
        self
    }

    /// A component module graded against the reference kit only.
    pub fn with_empty_module(self, module: &str) -> Self {
        self.homework(module);
        self
    }

    /// Write a file at the curriculum root (e.g. a config file).
    pub fn write_root(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(name);
        fs::write(&path, content).expect("write root file");
        path
    }
}

/// Profile markup without its `<h1>`.
pub fn profile_without_h1() -> String {
    PROFILE_HTML.replace("<h1>Jordan Lee</h1>", "")
}
