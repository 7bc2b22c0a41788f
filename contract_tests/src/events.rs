//! Event call-boundary contracts
