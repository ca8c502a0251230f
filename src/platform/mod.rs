// Integration points with external collaborators

pub mod pose;
