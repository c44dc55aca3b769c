mod trips;
