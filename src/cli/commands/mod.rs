pub mod crypt;
pub mod keygen;
pub mod token;
