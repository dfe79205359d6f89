pub mod commitment_tests;
