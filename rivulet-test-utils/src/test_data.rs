// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Small concrete payload type for tests that want something richer than
//! integers.

/// A test payload with a couple of comparable fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Person {
    pub name: String,
    pub age: u32,
}

impl Person {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }
}

pub fn person_alice() -> Person {
    Person::new("Alice", 34)
}

pub fn person_bob() -> Person {
    Person::new("Bob", 29)
}

pub fn person_charlie() -> Person {
    Person::new("Charlie", 41)
}
