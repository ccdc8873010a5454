#[cfg(test)]
mod fixtures;

#[cfg(test)]
mod edit_tests;
#[cfg(test)]
mod job_tests;
#[cfg(test)]
mod pipeline_tests;
#[cfg(test)]
mod speaker_tests;
