pub mod bus_kmb;
pub mod passenger_traffic;
pub mod registry;
pub mod transport;
pub mod wait_times;
