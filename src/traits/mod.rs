pub mod fixed_int;
