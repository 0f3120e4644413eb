mod age;
mod common;
