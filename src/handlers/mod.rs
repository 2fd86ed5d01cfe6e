pub mod modality_worker;
