pub mod symspell;
