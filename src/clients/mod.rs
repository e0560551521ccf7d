pub mod etabus;
pub mod immd_traffic;
pub mod immd_wait_time;
